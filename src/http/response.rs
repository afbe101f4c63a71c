// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Protocol-agnostic HTTP response

use bytes::Bytes;
use reqwest::Version;
use serde::de::DeserializeOwned;

use super::headers;
use crate::error::Result;
use crate::mapper::{Cookies, Headers};

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: u16,
    /// Protocol version the server answered with
    pub version: Version,
    /// Response headers, lowercase names; the last value of a repeated header wins
    pub headers: Headers,
    /// Cookies set by the response, name to value
    pub cookies: Cookies,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response
    pub fn new(status: u16, version: Version, headers: Headers, cookies: Cookies, body: Bytes) -> Self {
        Self {
            status,
            version,
            headers,
            cookies,
            body,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .contains(&name)
            .then(|| self.headers.get(&name))
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// `HTTP/1.1 200` style status line
    pub fn status_line(&self) -> String {
        format!("{:?} {}", self.version, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &'static str) -> Response {
        let mut headers = Headers::new();
        headers.set("content-type", "application/json");
        Response::new(200, Version::HTTP_11, headers, Cookies::new(), Bytes::from(body))
    }

    #[test]
    fn test_response_status() {
        let resp = response("");
        assert!(resp.is_success());
        assert_eq!(resp.status_line(), "HTTP/1.1 200");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let resp = response("");
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.header("x-missing"), None);
    }

    #[test]
    fn test_json_body() {
        let resp = response(r#"{"ok":true}"#);
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(resp.text_lossy(), r#"{"ok":true}"#);
    }
}
