//! Derives the UI session from the stored bearer token.
//!
//! The token is a JWT, but only its payload segment is parsed. No signature
//! or expiry check happens here: the user id is for deciding what to show,
//! never for deciding what the user may do. The backend authorises every
//! request independently through the bearer header.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::Value;
use thiserror::Error;

use super::TokenStore;

// Standard alphabet, padding optional: JWT segments are unpadded.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has neither `sub` nor `user_id`")]
    MissingSubject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// Reads the store once. A token that cannot be decoded is removed from
    /// the store so the next read starts clean.
    pub fn derive(store: &dyn TokenStore) -> Self {
        let Some(token) = store.get() else {
            return Self::unauthenticated();
        };

        match decode_user_id(&token) {
            Ok(user_id) => Self {
                is_authenticated: true,
                user_id: Some(user_id),
                token: Some(token),
            },
            Err(err) => {
                log::warn!("Discarding stored auth token: {}", err);
                store.remove();
                Self::unauthenticated()
            }
        }
    }

    /// The user id as the backend's integer key, if it is one.
    pub fn numeric_user_id(&self) -> Option<i64> {
        self.user_id.as_deref()?.trim().parse().ok()
    }
}

/// Extracts the subject from a JWT payload without verifying the signature.
pub fn decode_user_id(token: &str) -> Result<String, TokenDecodeError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or(TokenDecodeError::MissingPayload)?;
    let standard = payload.replace('-', "+").replace('_', "/");
    let bytes = PAYLOAD_ENGINE.decode(standard)?;
    let json = String::from_utf8(bytes)?;
    let claims: Value = serde_json::from_str(&json)?;

    identifier(claims.get("sub"))
        .or_else(|| identifier(claims.get("user_id")))
        .ok_or(TokenDecodeError::MissingSubject)
}

// Empty strings, zero and non-scalar values don't count as an id.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
