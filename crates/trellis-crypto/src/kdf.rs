//! Key derivation using HKDF-SHA256

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Label for the initial X3DH derivation
pub const WHISPER_TEXT_INFO: &[u8] = b"WhisperText";

/// Label for root-key chain creation
pub const WHISPER_RATCHET_INFO: &[u8] = b"WhisperRatchet";

/// Largest output HKDF-SHA256 can expand to (255 blocks of 32 bytes)
pub const MAX_OUTPUT_LENGTH: usize = 255 * 32;

/// Derive `output_length` bytes from `input`.
///
/// Extracts with `salt` (a zero-filled salt when `None`), then expands
/// with `info` as the domain-separation label. The returned buffer is
/// zeroized when dropped.
///
/// # Errors
///
/// - `InvalidOutputLength`: `output_length` exceeds [`MAX_OUTPUT_LENGTH`]
pub fn derive_secrets(
    input: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
    output_length: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let invalid_length =
        || CryptoError::InvalidOutputLength { requested: output_length, max: MAX_OUTPUT_LENGTH };

    if output_length > MAX_OUTPUT_LENGTH {
        return Err(invalid_length());
    }

    let hkdf = Hkdf::<Sha256>::new(salt, input);

    let mut okm = Zeroizing::new(vec![0u8; output_length]);
    hkdf.expand(info, okm.as_mut_slice()).map_err(|_| invalid_length())?;

    Ok(okm)
}
