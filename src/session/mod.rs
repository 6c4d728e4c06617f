//! Session layer: everything the client tracks about the room besides the
//! timeline, behind explicit seams to the external conferencing SDK.
mod adapter;
mod colors;
mod context;
mod events;
mod roster;
mod talk;

pub use adapter::room_events_from_chat;
pub use colors::{ColorAssigner, PALETTE_LEN, PaletteColor};
pub use context::SessionContext;
pub use events::RoomEvent;
pub use roster::{Participant, Roster, SYSTEM_IDENTITY, display_name_from, is_bot};
pub use talk::{LocalTrack, MediaEndpoint, TalkGate, TrackKind};
