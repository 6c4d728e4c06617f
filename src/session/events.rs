/// Normalized room events.
///
/// The conferencing SDK reports these through a zoo of duck-typed callback
/// shapes, sometimes `(participant)` and sometimes `(metadata, participant)`.
/// The adapter folds them into one tagged type at the boundary so everything
/// downstream handles a single shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    ParticipantJoined {
        identity: String,
        name: Option<String>,
        metadata: Option<String>,
    },
    ParticipantLeft {
        identity: String,
    },
    MetadataChanged {
        identity: String,
        metadata: String,
    },
    ConnectionChanged {
        connected: bool,
    },
}
