use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Malformed access token: expected three dot-separated parts.")]
    MalformedToken,
    #[error("Failed to decode token payload: {source}")]
    TokenPayloadDecode {
        #[source]
        source: base64::DecodeError,
    },
    #[error("Failed to parse token payload: {source}")]
    TokenPayloadParse {
        #[source]
        source: serde_json::Error,
    },
    #[error("Token does not grant access to a room.")]
    TokenMissingRoom,
    #[error("Talking is blocked while the tape is rolling ({status}).")]
    TalkBlocked { status: String },
    #[error("Media endpoint error: {message}")]
    Media { message: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
