//! Captured frame contracts and the data-URI codec.
//!
//! A frame is immutable once produced: the capture engine hands over an
//! owned JPEG buffer and nothing downstream mutates it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// One encoded still photo produced by a capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Pixel width of the encoded image.
    pub width: u32,

    /// Pixel height of the encoded image.
    pub height: u32,

    /// JPEG-encoded pixels.
    pub jpeg: Vec<u8>,
}

impl CapturedFrame {
    pub fn new(width: u32, height: u32, jpeg: Vec<u8>) -> Self {
        Self {
            width,
            height,
            jpeg,
        }
    }

    /// Encode as a `data:image/jpeg;base64,...` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.jpeg))
    }
}

/// A decoded `data:` URI payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUriPayload {
    /// MIME type, e.g. `image/jpeg`. Empty when the URI omits it.
    pub mime: String,

    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Errors produced while decoding a `data:` URI.
#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("Not a data URI (missing `data:` prefix)")]
    NotDataUri,

    #[error("Malformed data URI: {message}")]
    Malformed { message: String },

    #[error("Invalid base64 payload: {source}")]
    Base64 { source: base64::DecodeError },
}

/// Whether a string looks like a `data:` URI rather than a file path.
pub fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}

/// Decode a `data:<mime>;base64,<payload>` URI.
///
/// Only base64-encoded payloads are supported; URL-encoded data URIs are
/// rejected as malformed.
pub fn decode_data_uri(uri: &str) -> Result<DataUriPayload, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::NotDataUri)?;

    let (header, payload) = rest.split_once(',').ok_or_else(|| DataUriError::Malformed {
        message: "missing `,` separator".to_string(),
    })?;

    let mime = match header.strip_suffix(";base64") {
        Some(mime) => mime,
        None => {
            return Err(DataUriError::Malformed {
                message: "payload is not base64-encoded".to_string(),
            })
        }
    };

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|source| DataUriError::Base64 { source })?;

    Ok(DataUriPayload {
        mime: mime.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let frame = CapturedFrame::new(2, 2, vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        let uri = frame.data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.mime, "image/jpeg");
        assert_eq!(decoded.bytes, frame.jpeg);
    }

    #[test]
    fn test_is_data_uri() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(!is_data_uri("/tmp/photo.jpg"));
        assert!(!is_data_uri("photo.jpg"));
    }

    #[test]
    fn test_decode_rejects_non_data_uri() {
        assert!(matches!(
            decode_data_uri("/tmp/photo.jpg"),
            Err(DataUriError::NotDataUri)
        ));
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        assert!(matches!(
            decode_data_uri("data:image/jpeg;base64"),
            Err(DataUriError::Malformed { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_url_encoded_payload() {
        assert!(matches!(
            decode_data_uri("data:text/plain,hello"),
            Err(DataUriError::Malformed { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_data_uri("data:image/jpeg;base64,!!!not-base64!!!"),
            Err(DataUriError::Base64 { .. })
        ));
    }
}
