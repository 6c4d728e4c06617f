//! Status vocabulary published by the caster.
//!
//! Labels are shown verbatim on the OSD; unknown labels pass through
//! untouched. The empty label is the steady "playing" state.

pub const STATUS_PLAYING: &str = "";
pub const STATUS_NO_TAPE: &str = "█ NO TAPE";
pub const STATUS_PLAY: &str = "⏵ PLAY";
pub const STATUS_PAUSE: &str = "▊ PAUSE";
pub const STATUS_TAPE_READY: &str = "⏯ TAPE READY";
pub const STATUS_SEEK: &str = "⏩ SEEK";
pub const STATUS_FWD: &str = "⏭ FWD";
pub const STATUS_BACK: &str = "⏮ BACK";
pub const STATUS_EJECT: &str = "⏏ EJECT";
pub const STATUS_LIVE_FEED: &str = "⏺ LIVE FEED";
pub const STATUS_DOWNLOADING: &str = "⏬ DOWNLOADING";
pub const STATUS_ERROR: &str = "! ERROR";

/// Whether push-to-talk stays blocked under this status: the tape (or a live
/// feed) is rolling and talkers would step on it.
pub fn blocks_talk(status: &str) -> bool {
    matches!(
        status,
        STATUS_PLAYING | STATUS_PLAY | STATUS_SEEK | STATUS_FWD | STATUS_BACK | STATUS_LIVE_FEED
    )
}

#[cfg(test)]
mod tests {
    use super::{
        STATUS_NO_TAPE, STATUS_PAUSE, STATUS_PLAY, STATUS_PLAYING, STATUS_TAPE_READY, blocks_talk,
    };
    use crate::error::{AppResult, ValidationError};

    #[test]
    fn rolling_statuses_block_talk() -> AppResult<()> {
        for status in [STATUS_PLAYING, STATUS_PLAY] {
            if !blocks_talk(status) {
                return Err(ValidationError::from(format!(
                    "status '{status}' should block talk"
                ))
                .into());
            }
        }
        for status in [STATUS_PAUSE, STATUS_NO_TAPE, STATUS_TAPE_READY, "custom"] {
            if blocks_talk(status) {
                return Err(ValidationError::from(format!(
                    "status '{status}' should not block talk"
                ))
                .into());
            }
        }
        Ok(())
    }
}
