use std::path::Path;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use futures_util::StreamExt;
use futures_util::stream;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use uuid::Uuid;

use crate::http::{BoxError, ReqBody};

/// Multipart field name the backend reads uploads from.
pub const FILE_FIELD: &str = "file";

/// Bytes handed to the transport per body frame.
const CHUNK_SIZE: usize = 16 * 1024;

/// Receives whole-number upload percentages in `0..=100`.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: &str, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_FIELD.to_string());

        Ok(Self::new(&file_name, bytes))
    }
}

/// A ready-to-send multipart body and its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct Multipart {
    pub content_type: String,
    pub body: Bytes,
}

pub fn encode_multipart(file: &UploadFile) -> Multipart {
    let boundary = format!("----lims-{}", Uuid::new_v4().simple());
    // Quotes and line breaks would end the header early.
    let file_name: String = file
        .file_name
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();

    let mut body = BytesMut::with_capacity(file.bytes.len() + 256);
    body.put_slice(format!("--{}\r\n", boundary).as_bytes());
    body.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            FILE_FIELD, file_name
        )
        .as_bytes(),
    );
    body.put_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    body.put_slice(&file.bytes);
    body.put_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Multipart {
        content_type: format!("multipart/form-data; boundary={}", boundary),
        body: body.freeze(),
    }
}

/// `round(loaded * 100 / total)`, `None` while the total is unknown.
pub fn percent(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let loaded = loaded.min(total);
    let pct = (loaded * 100 + total / 2) / total;
    Some(pct.min(100) as u8)
}

/// Stream `bytes` in chunks, reporting progress as each chunk is pulled by
/// the transport.
pub fn progress_body(bytes: Bytes, on_progress: Option<ProgressCallback>) -> ReqBody {
    let total = bytes.len() as u64;
    let chunks: Vec<Bytes> = (0..bytes.len())
        .step_by(CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
        .collect();

    let mut loaded = 0u64;
    let frames = stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        if let (Some(callback), Some(pct)) = (on_progress.as_ref(), percent(loaded, total)) {
            callback(pct);
        }
        Ok::<_, BoxError>(Frame::data(chunk))
    });

    BodyExt::boxed_unsync(StreamBody::new(frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn from_path_reads_bytes_and_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan-01.png");
        std::fs::write(&path, b"pixels").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();

        assert_eq!(file.file_name, "scan-01.png");
        assert_eq!(file.bytes, Bytes::from_static(b"pixels"));
        assert_eq!(file.content_type, "application/octet-stream");
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(0, 200), Some(0));
        assert_eq!(percent(1, 200), Some(1));
        assert_eq!(percent(1, 3), Some(33));
        assert_eq!(percent(2, 3), Some(67));
        assert_eq!(percent(500, 200), Some(100));
    }

    #[test]
    fn multipart_wraps_file_in_named_part() {
        let file = UploadFile::new("report\".pdf", &b"%PDF-1.4"[..]).with_content_type("application/pdf");
        let encoded = encode_multipart(&file);

        let boundary = encoded
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
            .to_string();
        let text = String::from_utf8(encoded.body.to_vec()).unwrap();

        assert!(text.starts_with(&format!("--{}\r\n", boundary)));
        assert!(text.contains("name=\"file\"; filename=\"report'.pdf\""));
        assert!(text.contains("Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n"));
        assert!(text.ends_with(&format!("--{}--\r\n", boundary)));
    }

    #[tokio::test]
    async fn progress_body_reports_every_chunk() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |pct| sink.lock().unwrap().push(pct));

        let payload = Bytes::from(vec![7u8; CHUNK_SIZE * 2 + 10]);
        let body = progress_body(payload.clone(), Some(callback));
        let collected = body.collect().await.unwrap().to_bytes();

        assert_eq!(collected, payload);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100));
    }

    #[tokio::test]
    async fn empty_upload_reports_nothing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |pct| sink.lock().unwrap().push(pct));

        let body = progress_body(Bytes::new(), Some(callback));
        assert!(body.collect().await.unwrap().to_bytes().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }
}
