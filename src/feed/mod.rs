//! State feed: the per-room WebSocket stream of playback status frames.
mod backoff;
mod client;
mod endpoint;
mod frame;
pub mod status;

pub use backoff::{Backoff, DEFAULT_DELAY_CAP, DEFAULT_INITIAL_DELAY};
pub use client::{FeedEvent, spawn_state_feed};
pub use endpoint::{chat_relay_url, room_endpoint, state_feed_url};
pub use frame::{StateFrame, decode_frame};
