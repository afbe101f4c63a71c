// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for gurl
//!
//! Client configuration and option bundles, body labelling, multipart
//! framing, protocol dispatch and response normalization.

mod body;
mod client;
mod dispatch;
mod multipart;
mod pool;
mod response;

pub use body::{encode_body, sniff, BodyKind, EncodedBody};
pub use client::{Client, RequestOptions};
pub use multipart::{build_multipart, MultipartBody};
pub use pool::{ClientPool, PoolStats, PooledClient};
pub use response::Response;

/// JSON media type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Default form media type
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Marker looked for inside a declared multipart content type
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Common HTTP headers, as stored in [`Response::headers`]
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const PROXY_AUTHENTICATE: &str = "proxy-authenticate";
    pub const WWW_AUTHENTICATE: &str = "www-authenticate";
}
