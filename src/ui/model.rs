use crate::session::PaletteColor;
use crate::timeline::{HoverPreview, TimelineState};

/// One rendered chat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: String,
    pub text: String,
    pub color: Option<PaletteColor>,
    pub system: bool,
    pub timestamp: String,
}

/// One rendered roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLine {
    pub name: String,
    pub color: Option<PaletteColor>,
    pub is_local: bool,
}

/// Everything the renderer needs, published over a watch channel by the
/// session loop.
#[derive(Debug, Clone, Default)]
pub struct UiData {
    pub room: String,
    pub feed_connected: bool,
    pub chat_connected: bool,
    /// At least one state frame has arrived; before that the OSD shows the
    /// idle tape label.
    pub feed_seen: bool,
    pub timeline: TimelineState,
    pub caption: String,
    pub hover: Option<HoverPreview>,
    pub participants: Vec<RosterLine>,
    pub chat: Vec<ChatLine>,
    pub input: String,
    pub talk_engaged: bool,
    pub talk_blocked: bool,
    pub no_color: bool,
}

/// Snapshot handed to the render task.
#[derive(Debug, Clone, Default)]
pub struct UiRenderData {
    pub room: String,
    pub feed_connected: bool,
    pub chat_connected: bool,
    pub feed_seen: bool,
    pub timeline: TimelineState,
    pub caption: String,
    pub hover: Option<HoverPreview>,
    pub participants: Vec<RosterLine>,
    pub chat: Vec<ChatLine>,
    pub input: String,
    pub talk_engaged: bool,
    pub talk_blocked: bool,
    pub no_color: bool,
}

impl From<&UiData> for UiRenderData {
    fn from(data: &UiData) -> Self {
        Self {
            room: data.room.clone(),
            feed_connected: data.feed_connected,
            chat_connected: data.chat_connected,
            feed_seen: data.feed_seen,
            timeline: data.timeline.clone(),
            caption: data.caption.clone(),
            hover: data.hover,
            participants: data.participants.clone(),
            chat: data.chat.clone(),
            input: data.input.clone(),
            talk_engaged: data.talk_engaged,
            talk_blocked: data.talk_blocked,
            no_color: data.no_color,
        }
    }
}
