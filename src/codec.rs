//! String normalization and base64 transport encoding.
//!
//! Every byte blob that crosses the record boundary (salts, nonces, points,
//! scalars) is carried as standard, padded base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::protocol::NormalizationForm;
use crate::{Error, Result};

/// Encodes bytes as standard padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard padded base64 string.
pub fn decode_base64(field: &str, encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| Error::MalformedInput(format!("{field} is not valid base64: {e}")))
}

/// Decodes a base64 string that must carry exactly `len` bytes.
pub fn decode_base64_exact(field: &str, encoded: &str, len: usize) -> Result<Vec<u8>> {
    let bytes = decode_base64(field, encoded)?;
    if bytes.len() != len {
        return Err(Error::MalformedInput(format!(
            "{field} must decode to {len} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Decodes `secret` as UTF-8 and applies the requested normalization form.
///
/// The normalized copy is wiped when dropped.
pub fn normalize(secret: &[u8], form: NormalizationForm) -> Result<Zeroizing<String>> {
    let text = core::str::from_utf8(secret)
        .map_err(|_| Error::MalformedInput("secret is not valid UTF-8".to_string()))?;

    let normalized = match form {
        NormalizationForm::Nfkc => text.nfkc().collect::<String>(),
    };

    Ok(Zeroizing::new(normalized))
}
