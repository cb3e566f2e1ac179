//! Invite codes.

use relaygroups_core::{CoreError, RandomSource};

use crate::error::{CatalogError, Result};

/// Characters an invite code is drawn from.
pub const INVITE_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 8;

// Largest multiple of 62 that fits in a byte. Bytes at or above it are
// redrawn so every character is equally likely.
const ACCEPT_BELOW: u8 = 248;

// Draws of 32 bytes before the source is considered broken.
const MAX_DRAWS: usize = 64;

/// Generate a code of `len` characters, uniform over [`INVITE_ALPHABET`].
///
/// `rand::distributions::Alphanumeric` would need an infallible `RngCore`,
/// and `RandomSource` failures must surface as errors, so bytes are mapped
/// here directly.
pub fn generate_invite_code(random: &dyn RandomSource, len: usize) -> Result<String> {
    if len == 0 {
        return Err(CatalogError::InvalidParameter(
            "invite code length must be positive".into(),
        ));
    }
    let mut code = String::with_capacity(len);
    let mut buf = [0u8; 32];
    let mut draws = 0;
    while code.len() < len {
        if draws == MAX_DRAWS {
            return Err(CoreError::RandomSource(
                "random source yields only rejected bytes".into(),
            )
            .into());
        }
        draws += 1;
        random.fill_bytes(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if code.len() == len {
                break;
            }
            code.push(INVITE_ALPHABET[(b % 62) as usize] as char);
        }
    }
    Ok(code)
}

/// Check that `code` is non-empty and alphanumeric.
pub fn is_valid_invite_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
