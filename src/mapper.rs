// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! String-to-string bag used for headers, cookies, query params and files

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unordered string map. `set` overwrites, `get` on a missing key yields `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapper(HashMap<String, String>);

/// Request headers
pub type Headers = Mapper;
/// Cookies sent or received, name to value
pub type Cookies = Mapper;
/// Query parameters
pub type Params = Mapper;
/// File attachments, form field name to local path
pub type Files = Mapper;

impl Mapper {
    /// Create an empty mapper
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value for `key`, or the empty string
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every entry of `other` into this mapper
    pub fn extend(&mut self, other: &Mapper) -> &mut Self {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
        self
    }

    /// Iterate over entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Mapper {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapper = Mapper::new();
        for (key, value) in iter {
            mapper.set(key, value);
        }
        mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut m = Mapper::new();
        m.set("a", "1").set("a", "2");
        assert_eq!(m.get("a"), "2");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let m = Mapper::new();
        assert_eq!(m.get("nope"), "");
        assert!(!m.contains("nope"));
    }

    #[test]
    fn test_extend_and_collect() {
        let mut m: Mapper = [("x", "1")].into_iter().collect();
        let other: Mapper = [("x", "2"), ("y", "3")].into_iter().collect();
        m.extend(&other);
        assert_eq!(m.get("x"), "2");
        assert_eq!(m.get("y"), "3");
    }
}
