// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # gurl - HTTP client with cookie jars and auth schemes
//!
//! A small curl-like HTTP client library and CLI.
//!
//! ## Features
//!
//! - HTTP/1.0, HTTP/1.1, HTTP/2 (prior knowledge) and HTTP/3 (opt-in feature)
//! - Netscape cookie-jar loading and per-URL cookie resolution
//! - Basic and Digest (RFC 2617) authentication, NTLM/Negotiate placeholders
//! - Body content-type sniffing for JSON and form data
//! - Multipart file uploads
//! - Proxy support with proxy authentication
//! - Client pool for concurrent transfers
//!
//! ## Example
//!
//! ```rust,no_run
//! use gurl::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new();
//!     client
//!         .add_header("Accept", "application/json")
//!         .add_param("q", "rust")
//!         .set_basic_auth("alice:secret")?;
//!
//!     let response = client.get("https://example.com/search").await?;
//!     println!("{} {}", response.status_line(), response.text_lossy());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod mapper;
pub mod proxy;

// Re-exports for convenience

// Client
pub use config::{ClientConfig, ClientIdentity, ProtocolVersion};
pub use http::{Client, ClientPool, PooledClient, RequestOptions, Response};

// Auth
pub use auth::{AuthScheme, AuthTarget, Authenticator, Credentials, DigestChallenge};

// Cookies
pub use cookie::{parse_cookie_line, Cookie, CookieJar};

// CLI
pub use cli::Cli;

// Errors
pub use error::{Error, Result};

// Mapper
pub use mapper::{Cookies, Files, Headers, Mapper, Params};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
