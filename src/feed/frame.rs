use serde::Deserialize;

use crate::error::FeedError;

/// One playback status frame as published by the caster.
///
/// The caster also sends preformatted `Position`/`Length` strings; the client
/// formats times itself, so those fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StateFrame {
    #[serde(default, rename = "Title")]
    pub title: String,
    #[serde(default, rename = "PositionMs")]
    pub position_ms: u64,
    #[serde(default, rename = "LengthMs")]
    pub length_ms: u64,
    #[serde(default, rename = "Status")]
    pub status: String,
}

impl StateFrame {
    /// The empty status label means the tape is rolling.
    pub fn is_playing(&self) -> bool {
        self.status.is_empty()
    }
}

/// Decodes one inbound text message into a frame.
///
/// # Errors
///
/// Returns an error when the message is not a valid frame; the caller logs
/// and discards it without affecting later frames.
pub fn decode_frame(text: &str) -> Result<StateFrame, FeedError> {
    serde_json::from_str(text).map_err(|err| FeedError::MalformedFrame { source: err })
}

#[cfg(test)]
mod tests {
    use super::{StateFrame, decode_frame};
    use crate::error::{AppResult, ValidationError};

    #[test]
    fn decodes_full_frame() -> AppResult<()> {
        let frame = decode_frame(
            "{\"Title\":\"Stalker\",\"PositionMs\":65000,\"LengthMs\":9711000,\"Status\":\"\",\"Position\":\"01:05\",\"Length\":\"02:41:51\"}",
        )?;
        let expected = StateFrame {
            title: "Stalker".to_owned(),
            position_ms: 65_000,
            length_ms: 9_711_000,
            status: String::new(),
        };
        if frame != expected {
            return Err(ValidationError::from(format!("unexpected frame: {frame:?}")).into());
        }
        if !frame.is_playing() {
            return Err(ValidationError::from("empty status must mean playing").into());
        }
        Ok(())
    }

    #[test]
    fn missing_fields_default() -> AppResult<()> {
        let frame = decode_frame("{\"Status\":\"▊ PAUSE\"}")?;
        if frame.length_ms != 0 || frame.position_ms != 0 || !frame.title.is_empty() {
            return Err(ValidationError::from("missing fields should default").into());
        }
        if frame.is_playing() {
            return Err(ValidationError::from("non-empty status must not be playing").into());
        }
        Ok(())
    }

    #[test]
    fn rejects_malformed_payloads() -> AppResult<()> {
        for text in ["", "not json", "[1,2,3]", "{\"PositionMs\":\"early\"}"] {
            if decode_frame(text).is_ok() {
                return Err(ValidationError::from(format!(
                    "payload '{text}' unexpectedly decoded"
                ))
                .into());
            }
        }
        Ok(())
    }
}
