// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body labelling
//!
//! Declared content types are trusted. Without one, the body bytes are
//! sniffed: `=` and `&` mean form data, `{...}` or `[...]` means JSON,
//! anything else goes out unlabelled. The order of the checks matters and a
//! wrong guess is acceptable; this never fails.

use bytes::Bytes;

use super::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, MULTIPART_CONTENT_TYPE};

/// What the encoder decided the body is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Multipart,
    Raw,
}

/// Body to send plus a content type to add, if one was inferred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub kind: BodyKind,
    /// Set only when the content type was sniffed, not declared
    pub inferred_content_type: Option<&'static str>,
    pub body: Option<Bytes>,
}

/// Decide how to send `body` given the declared content type.
pub fn encode_body(declared: Option<&str>, body: Option<Bytes>) -> EncodedBody {
    let declared = declared.unwrap_or("");

    let (kind, inferred_content_type) = if declared == JSON_CONTENT_TYPE {
        (BodyKind::Json, None)
    } else if declared == FORM_CONTENT_TYPE {
        (BodyKind::Form, None)
    } else if declared.contains(MULTIPART_CONTENT_TYPE) {
        (BodyKind::Multipart, None)
    } else if declared.is_empty() {
        match body.as_deref().map(sniff) {
            Some(sniffed) => (sniffed, label(sniffed)),
            None => (BodyKind::Raw, None),
        }
    } else {
        (BodyKind::Raw, None)
    };

    EncodedBody {
        kind,
        inferred_content_type,
        body,
    }
}

/// Guess the body type from its bytes
pub fn sniff(body: &[u8]) -> BodyKind {
    if body.contains(&b'=') && body.contains(&b'&') {
        BodyKind::Form
    } else if (body.starts_with(b"{") && body.ends_with(b"}"))
        || (body.starts_with(b"[") && body.ends_with(b"]"))
    {
        BodyKind::Json
    } else {
        BodyKind::Raw
    }
}

fn label(kind: BodyKind) -> Option<&'static str> {
    match kind {
        BodyKind::Json => Some(JSON_CONTENT_TYPE),
        BodyKind::Form => Some(FORM_CONTENT_TYPE),
        BodyKind::Multipart | BodyKind::Raw => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniffed(body: &'static str) -> EncodedBody {
        encode_body(None, Some(Bytes::from_static(body.as_bytes())))
    }

    #[test]
    fn test_sniff_form() {
        let out = sniffed("a=1&b=2");
        assert_eq!(out.kind, BodyKind::Form);
        assert_eq!(out.inferred_content_type, Some(FORM_CONTENT_TYPE));
        assert_eq!(out.body.as_deref(), Some(&b"a=1&b=2"[..]));
    }

    #[test]
    fn test_sniff_json() {
        assert_eq!(sniffed(r#"{"a":1}"#).inferred_content_type, Some(JSON_CONTENT_TYPE));
        assert_eq!(sniffed("[1,2]").kind, BodyKind::Json);
        assert_eq!(sniffed("{1,2]").kind, BodyKind::Raw);
    }

    #[test]
    fn test_sniff_plain_text() {
        let out = sniffed("plain text");
        assert_eq!(out.kind, BodyKind::Raw);
        assert_eq!(out.inferred_content_type, None);
        assert_eq!(out.body.as_deref(), Some(&b"plain text"[..]));
    }

    #[test]
    fn test_form_check_runs_before_json() {
        // JSON containing both '=' and '&' is labelled as a form
        assert_eq!(sniffed(r#"{"q":"a=b&c"}"#).kind, BodyKind::Form);
    }

    #[test]
    fn test_declared_types_are_trusted() {
        let body = Some(Bytes::from_static(b"a=1&b=2"));

        let json = encode_body(Some(JSON_CONTENT_TYPE), body.clone());
        assert_eq!(json.kind, BodyKind::Json);
        assert_eq!(json.inferred_content_type, None);

        let multipart = encode_body(Some("multipart/form-data; boundary=xyz"), body.clone());
        assert_eq!(multipart.kind, BodyKind::Multipart);

        let other = encode_body(Some("text/plain"), body.clone());
        assert_eq!(other.kind, BodyKind::Raw);
        assert_eq!(other.body, body);
    }

    #[test]
    fn test_no_body() {
        let out = encode_body(None, None);
        assert_eq!(out.kind, BodyKind::Raw);
        assert!(out.body.is_none());
        assert!(out.inferred_content_type.is_none());
    }

    #[test]
    fn test_binary_never_fails() {
        let out = encode_body(None, Some(Bytes::from_static(&[0xff, 0x00, 0xfe])));
        assert_eq!(out.kind, BodyKind::Raw);
    }
}
