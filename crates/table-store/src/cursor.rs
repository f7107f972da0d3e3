//! Opaque pagination cursors.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::StoreError;
use crate::item::AttrValue;

/// An opaque continuation token for paged queries and scans.
///
/// Internally the base64 encoding of the JSON-serialized last-evaluated
/// key attributes; callers must treat it as opaque and pass it back
/// unchanged to resume a page sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    /// Encodes a last-evaluated key as an opaque token.
    pub fn encode(last_key: &HashMap<String, AttrValue>) -> Result<Self, StoreError> {
        let json = serde_json::to_vec(last_key)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        Ok(Cursor(URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decodes the token back into key attributes.
    pub fn decode(&self) -> Result<HashMap<String, AttrValue>, StoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidCursor(e.to_string()))
    }

    /// Returns the token as a string for transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Cursor(token)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut key = HashMap::new();
        key.insert("PK".to_string(), AttrValue::S("ORDER#1".into()));
        key.insert("SK".to_string(), AttrValue::S("ORDER#1".into()));
        let cursor = Cursor::encode(&key).unwrap();
        assert_eq!(cursor.decode().unwrap(), key);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let cursor = Cursor::from("!!not-base64!!".to_string());
        assert!(matches!(cursor.decode(), Err(StoreError::InvalidCursor(_))));
    }
}
