//! Raw response bodies

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Raw body of one API response
///
/// Bytes are immutable, so every decode reads the payload from its start.
/// The pagination driver relies on this to read the same page twice: once in
/// the page handler for item data, once for the pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBody {
    bytes: Bytes,
}

impl PageBody {
    /// Wrap response bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Body length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty body
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the body as JSON into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.bytes).map_err(|e| Error::decode(e.to_string()))
    }
}

impl From<&'static str> for PageBody {
    fn from(s: &'static str) -> Self {
        Self::new(Bytes::from_static(s.as_bytes()))
    }
}

impl From<serde_json::Value> for PageBody {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value.to_string())
    }
}
