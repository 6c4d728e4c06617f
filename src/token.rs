//! Access token inspection.
//!
//! Join tokens are JWTs issued by the room server. The client only reads the
//! payload claims (room grant, identity, display name); signature
//! verification stays on the server side.
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{AppError, AppResult, SessionError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenGrants {
    /// Participant identity.
    #[serde(default)]
    pub sub: Option<String>,
    /// Participant display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub video: Option<VideoGrant>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoGrant {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default, rename = "roomJoin")]
    pub room_join: bool,
}

impl TokenGrants {
    pub fn room(&self) -> Option<&str> {
        self.video.as_ref().and_then(|grant| grant.room.as_deref())
    }

    pub fn identity(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Decodes the payload of a join token without verifying its signature.
///
/// # Errors
///
/// Returns an error when the token is not a three-part JWT or the payload is
/// not base64url-encoded JSON.
pub fn decode_token(token: &str) -> AppResult<TokenGrants> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AppError::session(SessionError::MalformedToken)),
    };

    let raw = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| AppError::session(SessionError::TokenPayloadDecode { source: err }))?;
    serde_json::from_slice(&raw)
        .map_err(|err| AppError::session(SessionError::TokenPayloadParse { source: err }))
}
