//! HTTP requests and responses as plain data.
//!
//! # Design
//! The request builder produces an `HttpRequest` and the classifier consumes
//! an `HttpResponse` without either of them touching the network. Executing
//! the round-trip is the job of an [`HttpTransport`](crate::HttpTransport),
//! which keeps building and classification deterministic and easy to test.
//!
//! Every Sync API call is a form POST, so requests carry no method.

use std::time::Duration;

/// Content type of every Sync API request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A form POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Upper bound on the whole round-trip, on top of any transport-wide
    /// timeout. Set from the calling context's deadline.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "http://localhost/sync".to_string(),
            headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: String::new(),
            timeout: None,
        };
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.header("user-agent"), None);
    }
}
