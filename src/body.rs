//! Request body types

use bytes::Bytes;

/// Request body payload.
///
/// Text and byte bodies are written to the wire verbatim; a JSON value is
/// serialized to its text form when the request is built.
#[derive(Debug, Clone)]
pub enum Body {
    /// UTF-8 text, sent unchanged
    Text(String),
    /// Raw bytes, sent unchanged
    Bytes(Bytes),
    /// Structured value, serialized with `serde_json`
    Json(serde_json::Value),
}

impl Body {
    /// Create a JSON body from any serializable value
    pub fn json(value: impl serde::Serialize) -> crate::Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Serialize into the exact bytes written to the transport.
    pub(crate) fn into_bytes(self) -> crate::Result<Bytes> {
        Ok(match self {
            Body::Text(text) => Bytes::from(text),
            Body::Bytes(bytes) => bytes,
            Body::Json(value) => Bytes::from(serde_json::to_vec(&value)?),
        })
    }
}

// Convenience From implementations
impl From<String> for Body {
    fn from(content: String) -> Self {
        Self::Text(content)
    }
}

impl From<&str> for Body {
    fn from(content: &str) -> Self {
        Self::Text(content.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(content: Bytes) -> Self {
        Self::Bytes(content)
    }
}

impl From<Vec<u8>> for Body {
    fn from(content: Vec<u8>) -> Self {
        Self::Bytes(content.into())
    }
}

impl From<&[u8]> for Body {
    fn from(content: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(content))
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_is_sent_verbatim() {
        let bytes = Body::from("test req body").into_bytes().unwrap();
        assert_eq!(bytes, Bytes::from_static(b"test req body"));
    }

    #[test]
    fn bytes_are_sent_verbatim() {
        let raw = Bytes::from_static(&[0x00, 0xff, 0x10]);
        assert_eq!(Body::from(raw.clone()).into_bytes().unwrap(), raw);
    }

    #[test]
    fn values_serialize_to_json_text() {
        let bytes = Body::from(json!({ "k": "v" })).into_bytes().unwrap();
        assert_eq!(bytes, Bytes::from_static(br#"{"k":"v"}"#));
    }

    #[test]
    fn serializable_types_become_json() {
        #[derive(serde::Serialize)]
        struct Probe {
            n: u32,
        }
        let bytes = Body::json(Probe { n: 7 }).unwrap().into_bytes().unwrap();
        assert_eq!(bytes, Bytes::from_static(br#"{"n":7}"#));
    }
}
