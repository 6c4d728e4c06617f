//! Transport commands: plain chat lines the caster interprets.

use crate::timeline::timecode::format_ms;

pub const PLAY_COMMAND: &str = "/play";
pub const PAUSE_COMMAND: &str = "/pause";

/// Seek request for an absolute tape position, formatted with the same rule
/// the timeline renders with so the two always agree.
pub fn seek_command(target_ms: u64) -> String {
    format!("/seek {}", format_ms(target_ms))
}

/// Skip backwards by whole seconds.
pub fn back_command(secs: u64) -> String {
    format!("/back {secs}")
}

/// Skip forwards by whole seconds.
pub fn fwd_command(secs: u64) -> String {
    format!("/fwd {secs}")
}

/// Chat lines starting with a slash are commands for the caster.
pub fn is_command(text: &str) -> bool {
    text.starts_with('/')
}
