//! Opaque result values
//!
//! The pipeline moves a [`Payload`] from Data through Delivery to Output by
//! value and never looks inside it. Only concrete roles interpret the variant.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes of the payload as it would be written to a byte stream
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Binary(bytes) => bytes.clone(),
            other => other.to_string().into_bytes(),
        }
    }

    /// JSON representation, wrapping text and bytes as JSON strings
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Json(value) => value.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Json(value) => write!(f, "{value}"),
            Payload::Binary(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_by_variant() {
        assert_eq!(Payload::from("Hello").to_string(), "Hello");
        assert_eq!(Payload::from(json!({"a": 1})).to_string(), r#"{"a":1}"#);
        assert_eq!(Payload::from(b"bytes".to_vec()).to_string(), "bytes");
    }

    #[test]
    fn test_to_json_wraps_text() {
        assert_eq!(Payload::from("hi").to_json(), json!("hi"));
        assert_eq!(Payload::from(json!([1, 2])).to_json(), json!([1, 2]));
    }

    #[test]
    fn test_binary_bytes_pass_through() {
        let raw = vec![0xff, 0x00, 0x41];
        assert_eq!(Payload::Binary(raw.clone()).to_bytes(), raw);
        assert!(Payload::Binary(raw).as_text().is_none());
    }
}
