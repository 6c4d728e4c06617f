//! Chat relay: inbound room chat and the outbound channel that carries both
//! ordinary messages and transport commands.
mod channel;
pub mod commands;
mod wire;

pub use channel::{ChatEvent, ChatHandle, OutboundChat, spawn_chat_relay};
pub use wire::{ChatAuthor, ChatFrame, decode_chat, encode_outbound};
