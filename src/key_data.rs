//! Decoding of base64 key blobs carried in headers.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Standard alphabet, padding optional, stray bits in the last symbol ignored.
const KEY_DATA_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyDataError {
    #[error("Could not decode base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Key data is empty")]
    Empty,
}

/// Decodes a base64 key blob, ignoring whitespace left over from header folding.
///
/// Never returns an empty key.
pub fn decode_key_data(data: &str) -> Result<Vec<u8>, KeyDataError> {
    // strip newlines and other whitespace
    let cleaned: String = data.split_whitespace().collect();
    let bytes = KEY_DATA_ENGINE.decode(cleaned.as_bytes())?;
    if bytes.is_empty() {
        return Err(KeyDataError::Empty);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_key_data() {
        assert_eq!(decode_key_data("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_key_data("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_key_data(" aGVs\r\n bG8= ").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_key_data_trailing_bits() {
        // Last symbol carries bits beyond the final byte.
        assert_eq!(decode_key_data("aGVsbG9=").unwrap(), b"hello");
        assert_eq!(decode_key_data("aGVsbG9").unwrap(), b"hello");
        assert_eq!(decode_key_data("YR==").unwrap(), b"a");
    }

    #[test]
    fn test_decode_key_data_errors() {
        assert_eq!(decode_key_data(""), Err(KeyDataError::Empty));
        assert_eq!(decode_key_data(" \r\n "), Err(KeyDataError::Empty));
        assert!(matches!(
            decode_key_data("not*base64!"),
            Err(KeyDataError::Base64Decode(_))
        ));
        assert!(matches!(
            decode_key_data("aGVsbG8=aGVsbG8="),
            Err(KeyDataError::Base64Decode(_))
        ));
    }
}
