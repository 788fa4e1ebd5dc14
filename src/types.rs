//! Core types for layout mirroring.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a SHA-256 digest
pub const FINGERPRINT_LEN: usize = 32;

/// Fingerprint: SHA-256 digest of a file's sampled content window
///
/// Serialized as a lowercase hex string of `2 * FINGERPRINT_LEN` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex form used in the persisted layout
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 12 hex characters, for log lines and tables
    pub fn short(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(12);
        s
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error parsing a fingerprint from its hex form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint '{input}': {reason}")]
pub struct ParseFingerprintError {
    pub input: String,
    pub reason: String,
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN * 2 {
            return Err(ParseFingerprintError {
                input: s.to_string(),
                reason: format!(
                    "expected {} hex characters, found {}",
                    FINGERPRINT_LEN * 2,
                    s.len()
                ),
            });
        }
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| ParseFingerprintError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// RelativePath: root-relative path as an ordered list of components
///
/// Equality is component-wise. Ordering is lexicographic by component, which
/// places every descendant of a path directly after it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    /// Build from already-validated components
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a component
    pub fn join(&self, component: impl Into<String>) -> RelativePath {
        let mut components = self.0.clone();
        components.push(component.into());
        Self(components)
    }

    /// True if `prefix` is this path or one of its ancestors
    pub fn starts_with(&self, prefix: &RelativePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True if one path equals or contains the other
    ///
    /// Two related paths cannot both hold a regular file at the same time.
    pub fn is_related(&self, other: &RelativePath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }

    /// Every proper ancestor, nearest last: `a/b/c` yields `a`, `a/b`
    pub fn ancestors(&self) -> impl Iterator<Item = RelativePath> + '_ {
        (1..self.0.len()).map(move |n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
