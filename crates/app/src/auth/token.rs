//! Bearer token formatting, parsing, and verifier input construction.
//!
//! Tokens look like `{kind}_{version}_{uuid}.{secret}` where `uuid` is the
//! storage row id in simple form and `secret` is 32 random bytes in
//! lower-case hex. Only an HMAC of the secret material is ever stored.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Number of secret bytes encoded in a token.
pub const TOKEN_SECRET_BYTES: usize = 32;

const TOKEN_SECRET_HEX_CHARS: usize = TOKEN_SECRET_BYTES * 2;

/// What a token grants; each kind has its own prefix so one can never be
/// replayed as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    PasswordReset,
}

impl TokenKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Session => "ms",
            Self::PasswordReset => "mr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVersion {
    V1,
}

impl TokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for TokenVersion {
    type Error = TokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(TokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for TokenVersion {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(TokenError::UnsupportedVersion),
        }
    }
}

/// Raw secret bytes, wiped on drop.
#[derive(Clone)]
pub struct TokenSecret([u8; TOKEN_SECRET_BYTES]);

impl TokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; TOKEN_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TOKEN_SECRET_BYTES] {
        &self.0
    }

    fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";

        let mut encoded = String::with_capacity(TOKEN_SECRET_HEX_CHARS);

        for byte in self.0 {
            for nibble in [byte >> 4, byte & 0x0f] {
                if let Some(&digit) = HEX.get(usize::from(nibble)) {
                    encoded.push(char::from(digit));
                }
            }
        }

        encoded
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != TOKEN_SECRET_HEX_CHARS {
            return None;
        }

        let mut bytes = [0_u8; TOKEN_SECRET_BYTES];

        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let [hi, lo] = pair else {
                return None;
            };

            *byte = (hex_nibble(*hi)? << 4) | hex_nibble(*lo)?;
        }

        Some(Self(bytes))
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(**redacted**)")
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub token_uuid: Uuid,
    pub version: TokenVersion,
    pub secret: TokenSecret,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token format is invalid")]
    InvalidFormat,

    #[error("token uses an unsupported version")]
    UnsupportedVersion,

    #[error("token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn format_token(
    kind: TokenKind,
    token_uuid: Uuid,
    version: TokenVersion,
    secret: &TokenSecret,
) -> String {
    format!(
        "{}_{}_{}.{}",
        kind.prefix(),
        version.segment(),
        token_uuid.simple(),
        secret.to_hex()
    )
}

/// Parse a token of the expected `kind`.
///
/// # Errors
///
/// Returns an error for a wrong prefix, an unknown version, a malformed uuid
/// or a secret that is not 64 hex characters.
pub fn parse_token(kind: TokenKind, token: &str) -> Result<ParsedToken, TokenError> {
    let (head, secret_hex) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;

    let mut segments = head.splitn(3, '_');

    let (Some(prefix), Some(version), Some(token_uuid)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenError::InvalidFormat);
    };

    if prefix != kind.prefix() {
        return Err(TokenError::InvalidFormat);
    }

    let version = version.parse()?;
    let token_uuid = Uuid::try_parse(token_uuid).map_err(|_err| TokenError::InvalidFormat)?;
    let secret = TokenSecret::from_hex(secret_hex).ok_or(TokenError::InvalidSecretEncoding)?;

    Ok(ParsedToken {
        token_uuid,
        version,
        secret,
    })
}

/// Canonical HMAC input: `{token_uuid}:{version}:{user_uuid}:{secret_hex}`.
#[must_use]
pub fn build_verifier_input(
    token_uuid: Uuid,
    version: TokenVersion,
    user_uuid: UserUuid,
    secret: &TokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        secret.to_hex(),
    )
    .into_bytes()
}

fn hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}
