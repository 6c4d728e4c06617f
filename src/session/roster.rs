use std::collections::BTreeMap;

use serde::Deserialize;

use super::colors::{ColorAssigner, PaletteColor};
use super::events::RoomEvent;

/// Synthetic identity carrying the tape's video/audio into the room.
pub const STREAMBOT_IDENTITY: &str = "streambot";
/// Synthetic identity bridging room chat to the caster.
pub const CHATBOT_IDENTITY: &str = "chatbot";
/// Author attached to relayed system notices.
pub const SYSTEM_IDENTITY: &str = "system";

/// Bot identities are filtered out of the human roster.
pub fn is_bot(identity: &str) -> bool {
    matches!(identity, STREAMBOT_IDENTITY | CHATBOT_IDENTITY)
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ParticipantMetadata {
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub identity: String,
    pub name: Option<String>,
    pub metadata: Option<String>,
    pub color: Option<PaletteColor>,
}

impl Participant {
    /// Display name resolution: metadata `displayName`, then the SDK name,
    /// then the bare identity. Metadata that is not JSON is ignored.
    pub fn display_name(&self) -> String {
        display_name_from(self.metadata.as_deref(), self.name.as_deref(), &self.identity)
    }
}

/// Room roster keyed by identity, fed from normalized events. Bots stay in
/// the map (their tracks matter) but out of the human listing.
#[derive(Debug, Default)]
pub struct Roster {
    entries: BTreeMap<String, Participant>,
    colors: ColorAssigner,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event; unrelated events are no-ops.
    pub fn apply(&mut self, event: &RoomEvent) {
        match event {
            RoomEvent::ParticipantJoined {
                identity,
                name,
                metadata,
            } => {
                let color = if is_bot(identity) {
                    None
                } else {
                    Some(self.colors.assign(identity))
                };
                self.entries.insert(
                    identity.clone(),
                    Participant {
                        identity: identity.clone(),
                        name: name.clone(),
                        metadata: metadata.clone(),
                        color,
                    },
                );
            }
            RoomEvent::ParticipantLeft { identity } => {
                self.entries.remove(identity);
                self.colors.release(identity);
            }
            RoomEvent::MetadataChanged { identity, metadata } => {
                if let Some(participant) = self.entries.get_mut(identity) {
                    participant.metadata = Some(metadata.clone());
                }
            }
            RoomEvent::ConnectionChanged { .. } => {}
        }
    }

    pub fn get(&self, identity: &str) -> Option<&Participant> {
        self.entries.get(identity)
    }

    /// Human participants, bots filtered out.
    pub fn humans(&self) -> impl Iterator<Item = &Participant> {
        self.entries
            .values()
            .filter(|participant| !is_bot(&participant.identity))
    }

    pub fn human_count(&self) -> usize {
        self.humans().count()
    }

    pub fn color_of(&self, identity: &str) -> Option<PaletteColor> {
        self.colors.get(identity)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.colors.clear();
    }
}

/// Resolves a display name the way tiles and chat entries do, for
/// identities that may not be in the roster yet.
pub fn display_name_from(metadata: Option<&str>, name: Option<&str>, identity: &str) -> String {
    if let Some(metadata) = metadata
        && let Ok(parsed) = serde_json::from_str::<ParticipantMetadata>(metadata)
        && let Some(display_name) = parsed.display_name
    {
        return display_name;
    }
    name.map_or_else(|| identity.to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{Roster, display_name_from, is_bot};
    use crate::error::{AppResult, ValidationError};
    use crate::session::RoomEvent;

    fn joined(identity: &str, name: Option<&str>, metadata: Option<&str>) -> RoomEvent {
        RoomEvent::ParticipantJoined {
            identity: identity.to_owned(),
            name: name.map(str::to_owned),
            metadata: metadata.map(str::to_owned),
        }
    }

    #[test]
    fn bots_stay_out_of_the_human_roster() -> AppResult<()> {
        let mut roster = Roster::new();
        roster.apply(&joined("streambot", None, None));
        roster.apply(&joined("chatbot", None, None));
        roster.apply(&joined("cg5k2", Some("Frida"), None));
        if roster.human_count() != 1 {
            return Err(ValidationError::from(format!(
                "expected 1 human, found {}",
                roster.human_count()
            ))
            .into());
        }
        if roster.get("streambot").is_none() {
            return Err(ValidationError::from("bots must still be tracked").into());
        }
        if !is_bot("streambot") || is_bot("cg5k2") {
            return Err(ValidationError::from("bot detection wrong").into());
        }
        Ok(())
    }

    #[test]
    fn display_names_prefer_metadata() -> AppResult<()> {
        let resolved = display_name_from(
            Some("{\"displayName\":\"Frida K.\"}"),
            Some("frida"),
            "cg5k2",
        );
        if resolved != "Frida K." {
            return Err(ValidationError::from(format!(
                "metadata name expected, got '{resolved}'"
            ))
            .into());
        }
        if display_name_from(Some("not json"), Some("frida"), "cg5k2") != "frida" {
            return Err(ValidationError::from("bad metadata must fall back to name").into());
        }
        if display_name_from(None, None, "cg5k2") != "cg5k2" {
            return Err(ValidationError::from("identity is the last fallback").into());
        }
        Ok(())
    }

    #[test]
    fn metadata_updates_change_display_names() -> AppResult<()> {
        let mut roster = Roster::new();
        roster.apply(&joined("cg5k2", None, None));
        roster.apply(&RoomEvent::MetadataChanged {
            identity: "cg5k2".to_owned(),
            metadata: "{\"displayName\":\"Frida\"}".to_owned(),
        });
        let participant = roster
            .get("cg5k2")
            .ok_or_else(|| ValidationError::from("participant missing"))?;
        let resolved = display_name_from(
            participant.metadata.as_deref(),
            participant.name.as_deref(),
            &participant.identity,
        );
        if resolved != "Frida" {
            return Err(ValidationError::from(format!(
                "expected updated name, got '{resolved}'"
            ))
            .into());
        }
        Ok(())
    }

    #[test]
    fn leaving_releases_the_color() -> AppResult<()> {
        let mut roster = Roster::new();
        roster.apply(&joined("cg5k2", None, None));
        if roster.color_of("cg5k2").is_none() {
            return Err(ValidationError::from("humans get a color on join").into());
        }
        roster.apply(&RoomEvent::ParticipantLeft {
            identity: "cg5k2".to_owned(),
        });
        if roster.color_of("cg5k2").is_some() {
            return Err(ValidationError::from("leaving must release the color").into());
        }
        Ok(())
    }
}
