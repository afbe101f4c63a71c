// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for gurl
//!
//! Every failure the library reports is a distinct variant, so callers can
//! branch on the kind of failure (configuration, cookie parsing, transport,
//! file system) without matching on message text.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for gurl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gurl
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration (bad `user:password`, bad proxy, bad PEM)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A verb was invoked with an empty URL
    #[error("empty url")]
    EmptyUrl,

    /// A file upload was requested with no file attached
    #[error("empty file")]
    EmptyFile,

    /// A cookie-jar line did not have 6 or 7 tab-separated fields
    #[error("incorrect number of fields in line {line}. Expected 6 or 7, got {fields}.")]
    MalformedLine { line: usize, fields: usize },

    /// A cookie-jar field could not be parsed (secure flag, expiry)
    #[error("parse error in line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A body value could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport failed (connect, TLS, timeout, protocol)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The requested protocol is not available in this build
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// A file could not be opened, read, created or written
    #[error("I/O error on {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a cookie-field parse error
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Create a file-system error bound to a path
    pub fn file_system(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Rejected before any network activity
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::EmptyUrl | Error::EmptyFile | Error::Serialization(_)
        )
    }

    /// Cookie-jar line errors; these abort a jar load
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::MalformedLine { .. } | Error::Parse { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::InvalidUrl(_) | Error::UnsupportedProtocol(_)
        )
    }

    /// Check if this is a file-system error
    pub fn is_file_system(&self) -> bool {
        matches!(self, Error::FileSystem { .. })
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }

    /// Line number for cookie-jar errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { line, .. } | Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Helper trait for attaching a path to I/O results
pub trait PathContext<T> {
    /// Convert an I/O error into [`Error::FileSystem`] for `path`
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> PathContext<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| Error::file_system(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_line_message() {
        let err = Error::MalformedLine { line: 3, fields: 4 };

        assert!(err.is_parse());
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "incorrect number of fields in line 3. Expected 6 or 7, got 4."
        );
    }

    #[test]
    fn test_configuration_kinds() {
        assert!(Error::EmptyUrl.is_configuration());
        assert!(Error::EmptyFile.is_configuration());
        assert!(Error::config("bad").is_configuration());
        assert!(!Error::EmptyUrl.is_transport());
    }

    #[test]
    fn test_path_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_path("/tmp/jar.txt").unwrap_err();

        assert!(err.is_file_system());
        assert!(err.to_string().contains("/tmp/jar.txt"));
    }
}
