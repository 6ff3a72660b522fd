use std::fmt;

/// A navigation target: normalized path plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            query: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new("/")
    }

    /// Parse `"/login?redirect=/dashboard"` style targets. Fragments are
    /// dropped.
    pub fn parse(target: &str) -> Self {
        let target = target.split('#').next().unwrap_or_default();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        Self {
            path: normalize_path(path),
            query: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// `/` is legal inside a query value and keeps redirect targets readable.
fn encode_component(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace("%2F", "/")
}

/// Leading slash, no trailing slash (except the root), no empty segments.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_slashes() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("dashboard/"), "/dashboard");
        assert_eq!(normalize_path("//samples//clients/"), "/samples/clients");
    }

    #[test]
    fn parses_and_formats_redirect_query() {
        let loc = Location::parse("/login?redirect=/dashboard");
        assert_eq!(loc.path, "/login");
        assert_eq!(loc.query_value("redirect"), Some("/dashboard"));
        assert_eq!(loc.to_string(), "/login?redirect=/dashboard");
    }

    #[test]
    fn encodes_reserved_query_characters() {
        let loc = Location::new("/login").with_query("redirect", "/a b&c");
        assert_eq!(loc.to_string(), "/login?redirect=/a+b%26c");
        assert_eq!(Location::parse(&loc.to_string()), loc);
    }

    #[test]
    fn drops_fragment() {
        let loc = Location::parse("/records/list#top");
        assert_eq!(loc.path, "/records/list");
        assert!(loc.query.is_empty());
    }
}
