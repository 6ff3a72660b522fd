//! Thin, typed wrappers over the REST endpoints. Every function goes through
//! the shared [`HttpClient`](crate::http::HttpClient) pipeline, so auth,
//! timeouts and failure notifications apply uniformly.

pub mod samples;
pub mod user;
pub mod workflow;
