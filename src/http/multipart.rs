// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! multipart/form-data body for file uploads

use std::path::Path;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use uuid::Uuid;

use super::MULTIPART_CONTENT_TYPE;
use crate::error::{PathContext, Result};
use crate::mapper::Files;

/// A framed multipart payload and its content type
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub boundary: String,
    pub body: Bytes,
}

impl MultipartBody {
    /// `multipart/form-data; boundary=...`
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", MULTIPART_CONTENT_TYPE, self.boundary)
    }
}

/// Stream every attached file into a form field named after its key.
/// Fields are written in key order.
pub async fn build_multipart(files: &Files) -> Result<MultipartBody> {
    let boundary = format!("gurl{}", Uuid::new_v4().simple());
    build_with_boundary(files, boundary).await
}

pub(crate) async fn build_with_boundary(files: &Files, boundary: String) -> Result<MultipartBody> {
    let mut entries: Vec<(&str, &str)> = files.iter().collect();
    entries.sort_unstable();

    let mut out = BytesMut::new();
    for (field, path) in entries {
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        out.put_slice(format!("--{boundary}\r\n").as_bytes());
        out.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quotes(field),
                escape_quotes(&file_name)
            )
            .as_bytes(),
        );
        out.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");

        let mut file = tokio::fs::File::open(path).await.with_path(path)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await.with_path(path)?;
        out.put_slice(&contents);
        out.put_slice(b"\r\n");
    }
    out.put_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(MultipartBody {
        boundary,
        body: out.freeze(),
    })
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_multipart_layout() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, "hello").unwrap();
        std::fs::write(&b, [1u8, 2, 3]).unwrap();

        let mut files = Files::new();
        files
            .set("second", b.to_string_lossy())
            .set("first", a.to_string_lossy());

        let out = build_with_boundary(&files, "XYZ".to_string()).await.unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"first\"; filename=\"a.txt\"\r\n\
              Content-Type: application/octet-stream\r\n\r\nhello\r\n",
        );
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"second\"; filename=\"b.bin\"\r\n\
              Content-Type: application/octet-stream\r\n\r\n\x01\x02\x03\r\n",
        );
        expected.extend_from_slice(b"--XYZ--\r\n");

        assert_eq!(out.body.as_ref(), expected.as_slice());
        assert_eq!(out.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let mut files = Files::new();
        files.set("f", "/definitely/not/here.txt");

        let err = build_multipart(&files).await.unwrap_err();
        assert!(err.is_file_system());
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
