use crate::chat::ChatEvent;

use super::events::RoomEvent;
use super::roster::{Roster, SYSTEM_IDENTITY, is_bot};

/// Folds chat relay activity into normalized room events.
///
/// A terminal session has no SDK callbacks; the relay is its only presence
/// signal. A first message from an unknown identity doubles as a join, a
/// known identity speaking under a new name becomes a metadata change, and
/// losing the relay drops every remote participant until they speak again.
pub fn room_events_from_chat(
    event: &ChatEvent,
    roster: &Roster,
    local_identity: &str,
) -> Vec<RoomEvent> {
    match event {
        ChatEvent::Connected => vec![RoomEvent::ConnectionChanged { connected: true }],
        ChatEvent::Disconnected { .. } => {
            let mut events = vec![RoomEvent::ConnectionChanged { connected: false }];
            for participant in roster.humans() {
                if participant.identity != local_identity {
                    events.push(RoomEvent::ParticipantLeft {
                        identity: participant.identity.clone(),
                    });
                }
            }
            events
        }
        ChatEvent::Message(frame) => {
            let Some(author) = frame.from.as_ref() else {
                return Vec::new();
            };
            let Some(identity) = author.identity.as_deref() else {
                return Vec::new();
            };
            if identity.is_empty() || identity == SYSTEM_IDENTITY || is_bot(identity) {
                return Vec::new();
            }

            match roster.get(identity) {
                None => vec![RoomEvent::ParticipantJoined {
                    identity: identity.to_owned(),
                    name: author.name.clone(),
                    metadata: None,
                }],
                Some(known) => match author.name.as_deref() {
                    Some(name) if known.name.as_deref() != Some(name) => {
                        vec![RoomEvent::MetadataChanged {
                            identity: identity.to_owned(),
                            metadata: format!("{{\"displayName\":\"{name}\"}}"),
                        }]
                    }
                    Some(_) | None => Vec::new(),
                },
            }
        }
    }
}
