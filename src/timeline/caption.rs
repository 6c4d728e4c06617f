use std::time::Duration;

/// Grace period during which a stale status label keeps showing after the
/// tape goes back to plain playing; avoids caption flicker between transport
/// states.
pub const LINGER_DURATION: Duration = Duration::from_millis(2_000);

/// What the reducer wants done after observing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionUpdate {
    Unchanged,
    /// The caption text changed immediately.
    Shown,
    /// Keep the current text and fire [`Caption::linger_elapsed`] with this
    /// generation after [`LINGER_DURATION`].
    LingerStarted { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Showing,
    Lingering {
        generation: u64,
    },
}

/// OSD caption state machine.
///
/// Non-empty labels always show immediately. The transition into the empty
/// (playing) label is delayed by one linger period; a label arriving during
/// that window cancels the pending clear. Timers carry the generation they
/// were started with, so a stale timer firing after a newer label can never
/// clobber it.
#[derive(Debug, Clone, Default)]
pub struct Caption {
    text: String,
    last_status: String,
    phase: Phase,
    generation: u64,
}

impl Caption {
    pub fn observe(&mut self, status: &str) -> CaptionUpdate {
        let update = if status.is_empty() {
            match self.phase {
                Phase::Showing if !self.last_status.is_empty() => {
                    self.generation = self.generation.saturating_add(1);
                    self.phase = Phase::Lingering {
                        generation: self.generation,
                    };
                    CaptionUpdate::LingerStarted {
                        generation: self.generation,
                    }
                }
                // Repeated playing frames neither refresh nor cancel a
                // pending linger.
                Phase::Showing | Phase::Lingering { .. } => CaptionUpdate::Unchanged,
            }
        } else {
            self.phase = Phase::Showing;
            if self.text == status {
                CaptionUpdate::Unchanged
            } else {
                self.text.clear();
                self.text.push_str(status);
                CaptionUpdate::Shown
            }
        };
        self.last_status.clear();
        self.last_status.push_str(status);
        update
    }

    /// Timer callback. Only the timer matching the active linger generation
    /// may clear the caption; anything else is a stale no-op.
    pub fn linger_elapsed(&mut self, generation: u64) -> bool {
        match self.phase {
            Phase::Lingering {
                generation: current,
            } if current == generation => {
                self.phase = Phase::Showing;
                self.text.clear();
                true
            }
            Phase::Showing | Phase::Lingering { .. } => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_lingering(&self) -> bool {
        matches!(self.phase, Phase::Lingering { .. })
    }
}
