//! Playback timeline: reduces state frames into a renderable snapshot and a
//! lingering OSD caption, and maps bar columns back into seek targets.
mod caption;
mod scrub;
pub mod timecode;

pub use caption::{Caption, CaptionUpdate, LINGER_DURATION};
pub use scrub::{BarGeometry, HoverPreview};

use crate::feed::StateFrame;

/// Snapshot derived from the most recent frame. A pure function of that
/// frame; replaying the same frame yields the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineState {
    pub title: String,
    pub current_ms: u64,
    pub total_ms: u64,
    pub playing: bool,
    pub raw_status: String,
}

impl TimelineState {
    /// A zero length is the "nothing loaded" sentinel; the timeline is not
    /// rendered at all while it holds.
    pub fn has_tape(&self) -> bool {
        self.total_ms > 0
    }

    /// Elapsed portion scaled to `scale` units, clamped so overshooting
    /// positions never spill past the end of the bar.
    pub fn progress_scaled(&self, scale: u64) -> u64 {
        if self.total_ms == 0 {
            return 0;
        }
        let clamped = self.current_ms.min(self.total_ms);
        let scaled = u128::from(clamped)
            .saturating_mul(u128::from(scale))
            .checked_div(u128::from(self.total_ms))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// The reducer: numeric fields and title update unconditionally on every
/// frame; only the caption is subject to the linger policy.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    state: TimelineState,
    caption: Caption,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, frame: &StateFrame) -> CaptionUpdate {
        self.state.title.clone_from(&frame.title);
        self.state.current_ms = frame.position_ms;
        self.state.total_ms = frame.length_ms;
        self.state.playing = frame.is_playing();
        self.state.raw_status.clone_from(&frame.status);
        self.caption.observe(&frame.status)
    }

    /// Linger timer callback. Returns false (and changes nothing) when the
    /// firing timer is no longer the active one.
    pub fn linger_elapsed(&mut self, generation: u64) -> bool {
        self.caption.linger_elapsed(generation)
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn caption_text(&self) -> &str {
        self.caption.text()
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptionUpdate, Timeline, TimelineState};
    use crate::error::{AppResult, ValidationError};
    use crate::feed::StateFrame;

    fn frame(position_ms: u64, length_ms: u64, status: &str) -> StateFrame {
        StateFrame {
            title: "Stalker".to_owned(),
            position_ms,
            length_ms,
            status: status.to_owned(),
        }
    }

    #[test]
    fn playing_follows_empty_status() -> AppResult<()> {
        let mut timeline = Timeline::new();
        timeline.apply(&frame(0, 1_000, ""));
        if !timeline.state().playing {
            return Err(ValidationError::from("empty status must set playing").into());
        }
        for status in ["⏵ PLAY", "▊ PAUSE", "custom"] {
            timeline.apply(&frame(0, 1_000, status));
            if timeline.state().playing {
                return Err(ValidationError::from(format!(
                    "status '{status}' must not set playing"
                ))
                .into());
            }
        }
        Ok(())
    }

    #[test]
    fn numeric_fields_update_during_linger() -> AppResult<()> {
        let mut timeline = Timeline::new();
        timeline.apply(&frame(1_000, 60_000, "⏵ PLAY"));
        let update = timeline.apply(&frame(2_000, 60_000, ""));
        if !matches!(update, CaptionUpdate::LingerStarted { .. }) {
            return Err(ValidationError::from("expected a linger start").into());
        }
        if timeline.caption_text() != "⏵ PLAY" {
            return Err(ValidationError::from("caption must linger on the old label").into());
        }
        if timeline.state().current_ms != 2_000 || !timeline.state().playing {
            return Err(
                ValidationError::from("numeric fields must update despite linger").into(),
            );
        }
        Ok(())
    }

    #[test]
    fn zero_length_is_no_tape() -> AppResult<()> {
        let mut timeline = Timeline::new();
        timeline.apply(&frame(5_000, 0, "█ NO TAPE"));
        if timeline.state().has_tape() {
            return Err(ValidationError::from("zero length must mean no tape").into());
        }
        Ok(())
    }

    #[test]
    fn progress_is_clamped() -> AppResult<()> {
        let state = TimelineState {
            current_ms: 90_000,
            total_ms: 60_000,
            ..TimelineState::default()
        };
        if state.progress_scaled(100) != 100 {
            return Err(ValidationError::from("overshoot must clamp to full").into());
        }
        let halfway = TimelineState {
            current_ms: 30_000,
            total_ms: 60_000,
            ..TimelineState::default()
        };
        if halfway.progress_scaled(100) != 50 {
            return Err(ValidationError::from("halfway must scale to 50").into());
        }
        let empty = TimelineState::default();
        if empty.progress_scaled(100) != 0 {
            return Err(ValidationError::from("no tape must scale to 0").into());
        }
        Ok(())
    }

    #[test]
    fn replaying_a_frame_is_idempotent() -> AppResult<()> {
        let mut timeline = Timeline::new();
        let sample = frame(12_345, 60_000, "⏭ FWD");
        timeline.apply(&sample);
        let first = timeline.state().clone();
        timeline.apply(&sample);
        if timeline.state() != &first {
            return Err(ValidationError::from("replaying a frame must not drift").into());
        }
        Ok(())
    }
}
