use async_trait::async_trait;
use tracing::warn;

use crate::error::SessionError;
use crate::feed::status::blocks_talk;

use super::context::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Camera,
    Microphone,
}

/// Opaque descriptor of a local track held by the external SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTrack {
    pub kind: TrackKind,
    pub id: String,
}

/// Seam to the conferencing SDK's media surface. The client never touches
/// devices or negotiates tracks itself.
#[async_trait]
pub trait MediaEndpoint: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the device cannot be acquired.
    async fn acquire(&self, kind: TrackKind) -> Result<LocalTrack, SessionError>;

    /// # Errors
    ///
    /// Returns an error when the track cannot be published to the room.
    async fn publish(&self, track: &LocalTrack) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns an error when the track cannot be unpublished.
    async fn unpublish(&self, track: &LocalTrack) -> Result<(), SessionError>;
}

/// Push-to-talk: both local tracks are published only while the gate is
/// engaged, and engaging is refused while the tape is rolling.
#[derive(Debug, Default)]
pub struct TalkGate {
    engaged: bool,
    published: Vec<LocalTrack>,
}

impl TalkGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Whether engaging would currently be refused.
    pub fn blocked_by(status: &str) -> bool {
        blocks_talk(status)
    }

    /// Publishes camera and microphone, preferring pre-acquired tracks and
    /// acquiring on demand otherwise. On failure every track published so
    /// far is rolled back and the gate stays released.
    ///
    /// # Errors
    ///
    /// Returns an error when talking is blocked by the playback status or a
    /// media operation fails.
    pub async fn engage(
        &mut self,
        context: &mut SessionContext,
        endpoint: &dyn MediaEndpoint,
        status: &str,
    ) -> Result<(), SessionError> {
        if blocks_talk(status) {
            return Err(SessionError::TalkBlocked {
                status: status.to_owned(),
            });
        }
        if self.engaged {
            return Ok(());
        }

        for kind in [TrackKind::Camera, TrackKind::Microphone] {
            let track = match context.take_pre_acquired(kind) {
                Some(track) => track,
                None => match endpoint.acquire(kind).await {
                    Ok(track) => track,
                    Err(err) => {
                        self.rollback(context, endpoint).await;
                        return Err(err);
                    }
                },
            };
            if let Err(err) = endpoint.publish(&track).await {
                if let Err(store_err) = context.store_pre_acquired(track) {
                    warn!("Dropping track after failed publish: {}", store_err);
                }
                self.rollback(context, endpoint).await;
                return Err(err);
            }
            self.published.push(track);
        }

        self.engaged = true;
        Ok(())
    }

    /// Unpublishes everything and returns the tracks to the session context
    /// so the next engage is instant.
    ///
    /// # Errors
    ///
    /// Returns the first unpublish error; remaining tracks are still
    /// processed.
    pub async fn release(
        &mut self,
        context: &mut SessionContext,
        endpoint: &dyn MediaEndpoint,
    ) -> Result<(), SessionError> {
        self.engaged = false;
        let mut first_error = None;
        for track in self.published.drain(..) {
            if let Err(err) = endpoint.unpublish(&track).await {
                if first_error.is_none() {
                    first_error = Some(err);
                }
                continue;
            }
            if let Err(err) = context.store_pre_acquired(track) {
                warn!("Dropping track after release: {}", err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self, context: &mut SessionContext, endpoint: &dyn MediaEndpoint) {
        for track in self.published.drain(..) {
            if let Err(err) = endpoint.unpublish(&track).await {
                warn!("Rollback unpublish failed: {}", err);
                continue;
            }
            if let Err(err) = context.store_pre_acquired(track) {
                warn!("Dropping track during rollback: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{LocalTrack, MediaEndpoint, TalkGate, TrackKind};
    use crate::error::{AppResult, SessionError, ValidationError};
    use crate::feed::status::{STATUS_PAUSE, STATUS_PLAYING};
    use crate::session::SessionContext;

    #[derive(Default)]
    struct FakeEndpoint {
        log: Mutex<Vec<String>>,
        fail_publish: bool,
        fail_acquire: bool,
    }

    impl FakeEndpoint {
        fn log_entry(&self, entry: String) {
            if let Ok(mut log) = self.log.lock() {
                log.push(entry);
            }
        }

        fn entries(&self) -> Vec<String> {
            self.log.lock().map(|log| log.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl MediaEndpoint for FakeEndpoint {
        async fn acquire(&self, kind: TrackKind) -> Result<LocalTrack, SessionError> {
            if self.fail_acquire {
                return Err(SessionError::Media {
                    message: "no device".to_owned(),
                });
            }
            let id = format!("{kind:?}-track");
            self.log_entry(format!("acquire {kind:?}"));
            Ok(LocalTrack { kind, id })
        }

        async fn publish(&self, track: &LocalTrack) -> Result<(), SessionError> {
            if self.fail_publish {
                return Err(SessionError::Media {
                    message: "publish refused".to_owned(),
                });
            }
            self.log_entry(format!("publish {}", track.id));
            Ok(())
        }

        async fn unpublish(&self, track: &LocalTrack) -> Result<(), SessionError> {
            self.log_entry(format!("unpublish {}", track.id));
            Ok(())
        }
    }

    #[tokio::test]
    async fn engage_publishes_pre_acquired_tracks() -> AppResult<()> {
        let endpoint = FakeEndpoint::default();
        let mut context = SessionContext::new();
        context.pre_acquire(&endpoint).await;
        if context.pre_acquired_video_track.is_none() || context.pre_acquired_audio_track.is_none()
        {
            return Err(ValidationError::from("pre-acquire should fill both slots").into());
        }

        let mut gate = TalkGate::new();
        gate.engage(&mut context, &endpoint, STATUS_PAUSE).await?;
        if !gate.is_engaged() {
            return Err(ValidationError::from("gate should be engaged").into());
        }
        let entries = endpoint.entries();
        let publishes = entries
            .iter()
            .filter(|entry| entry.starts_with("publish"))
            .count();
        if publishes != 2 {
            return Err(ValidationError::from(format!(
                "expected 2 publishes, log: {entries:?}"
            ))
            .into());
        }
        // Pre-acquired tracks were consumed, not re-acquired.
        let acquires = entries
            .iter()
            .filter(|entry| entry.starts_with("acquire"))
            .count();
        if acquires != 2 {
            return Err(ValidationError::from("only the pre-acquisition acquires expected").into());
        }
        Ok(())
    }

    #[tokio::test]
    async fn release_returns_tracks_for_reuse() -> AppResult<()> {
        let endpoint = FakeEndpoint::default();
        let mut context = SessionContext::new();
        context.pre_acquire(&endpoint).await;
        let mut gate = TalkGate::new();
        gate.engage(&mut context, &endpoint, STATUS_PAUSE).await?;
        gate.release(&mut context, &endpoint).await?;
        if gate.is_engaged() {
            return Err(ValidationError::from("gate should be released").into());
        }
        if context.pre_acquired_video_track.is_none() || context.pre_acquired_audio_track.is_none()
        {
            return Err(ValidationError::from("tracks should return to their slots").into());
        }
        // The second engage reuses the same tracks without new acquires.
        gate.engage(&mut context, &endpoint, STATUS_PAUSE).await?;
        let acquires = endpoint
            .entries()
            .iter()
            .filter(|entry| entry.starts_with("acquire"))
            .count();
        if acquires != 2 {
            return Err(ValidationError::from("re-engage must not re-acquire").into());
        }
        Ok(())
    }

    #[tokio::test]
    async fn engage_is_refused_while_playing() -> AppResult<()> {
        let endpoint = FakeEndpoint::default();
        let mut context = SessionContext::new();
        let mut gate = TalkGate::new();
        let result = gate.engage(&mut context, &endpoint, STATUS_PLAYING).await;
        if !matches!(result, Err(SessionError::TalkBlocked { .. })) {
            return Err(ValidationError::from("playing status must block talk").into());
        }
        if gate.is_engaged() || !endpoint.entries().is_empty() {
            return Err(ValidationError::from("blocked engage must touch nothing").into());
        }
        Ok(())
    }

    #[tokio::test]
    async fn failed_publish_rolls_back() -> AppResult<()> {
        let endpoint = FakeEndpoint {
            fail_publish: true,
            ..FakeEndpoint::default()
        };
        let mut context = SessionContext::new();
        context.pre_acquire(&endpoint).await;
        let mut gate = TalkGate::new();
        let result = gate.engage(&mut context, &endpoint, STATUS_PAUSE).await;
        if result.is_ok() || gate.is_engaged() {
            return Err(ValidationError::from("failed publish must leave the gate released").into());
        }
        if context.pre_acquired_video_track.is_none() {
            return Err(
                ValidationError::from("the unpublished track should return to its slot").into(),
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn acquire_failure_surfaces_on_demand() -> AppResult<()> {
        let endpoint = FakeEndpoint {
            fail_acquire: true,
            ..FakeEndpoint::default()
        };
        let mut context = SessionContext::new();
        context.pre_acquire(&endpoint).await;
        if context.pre_acquired_video_track.is_some() {
            return Err(ValidationError::from("failed pre-acquire must leave slots empty").into());
        }
        if context.acquisition_in_flight {
            return Err(ValidationError::from("in-flight flag must reset").into());
        }
        let mut gate = TalkGate::new();
        let result = gate.engage(&mut context, &endpoint, STATUS_PAUSE).await;
        if result.is_ok() {
            return Err(ValidationError::from("on-demand acquire failure must surface").into());
        }
        Ok(())
    }
}
