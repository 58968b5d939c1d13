//! Scannable vehicle identity tokens.
//!
//! A [`VehicleToken`] is the opaque string encoded into a vehicle's QR
//! sticker. It is issued once at registration and never changes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix marking a string as a parking-lot vehicle token.
pub const TOKEN_PREFIX: &str = "CAR-";

/// Number of random bytes behind every generated token (128 bits).
pub const TOKEN_ENTROPY_BYTES: usize = 16;

/// Opaque, unique, immutable vehicle identity string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleToken(String);

impl VehicleToken {
    /// Wraps an existing token string, e.g. one decoded from a scan.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh token: [`TOKEN_PREFIX`] followed by 128 bits of
    /// CSPRNG output rendered as lowercase hex.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; TOKEN_ENTROPY_BYTES] = rand::random();
        Self(format!("{TOKEN_PREFIX}{}", hex::encode(bytes)))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VehicleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VehicleToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of freshly issued tokens.
///
/// The registry draws every candidate token from a `TokenSource`; the
/// production source is [`RandomTokenSource`].
pub trait TokenSource: Send + Sync + fmt::Debug {
    /// Produces the next candidate token.
    fn next_token(&self) -> VehicleToken;
}

/// [`TokenSource`] backed by [`VehicleToken::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn next_token(&self) -> VehicleToken {
        VehicleToken::generate()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_prefix_and_full_entropy() {
        let token = VehicleToken::generate();
        let Some(hex_part) = token.as_str().strip_prefix(TOKEN_PREFIX) else {
            panic!("token must carry the prefix");
        };
        assert_eq!(hex_part.len(), TOKEN_ENTROPY_BYTES * 2);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_differ() {
        let source = RandomTokenSource;
        assert_ne!(source.next_token(), source.next_token());
    }

    #[test]
    fn wraps_scanned_string_verbatim() {
        let token = VehicleToken::new("CAR-abc");
        assert_eq!(token.to_string(), "CAR-abc");
        assert_eq!(token.into_inner(), "CAR-abc");
    }
}
