use tracing::{info, warn};

use crate::error::SessionError;

use super::talk::{LocalTrack, MediaEndpoint, TrackKind};

/// Session-scoped media context.
///
/// Tracks are created once up front so engaging push-to-talk is instant, and
/// they live in an explicit object owned by the session rather than as ad hoc
/// fields stuck onto the SDK's room object.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub pre_acquired_video_track: Option<LocalTrack>,
    pub pre_acquired_audio_track: Option<LocalTrack>,
    pub acquisition_in_flight: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates both local tracks ahead of time. Failures are logged and
    /// leave the slots empty; push-to-talk then acquires on demand.
    pub async fn pre_acquire(&mut self, endpoint: &dyn MediaEndpoint) {
        if self.acquisition_in_flight
            || self.pre_acquired_video_track.is_some()
            || self.pre_acquired_audio_track.is_some()
        {
            return;
        }
        self.acquisition_in_flight = true;

        match endpoint.acquire(TrackKind::Camera).await {
            Ok(track) => {
                self.pre_acquired_video_track = Some(track);
            }
            Err(err) => warn!("Failed to pre-acquire the camera track: {}", err),
        }
        match endpoint.acquire(TrackKind::Microphone).await {
            Ok(track) => {
                self.pre_acquired_audio_track = Some(track);
            }
            Err(err) => warn!("Failed to pre-acquire the microphone track: {}", err),
        }

        self.acquisition_in_flight = false;
        if self.pre_acquired_video_track.is_some() && self.pre_acquired_audio_track.is_some() {
            info!("Local tracks ready; talk toggling will be instant.");
        }
    }

    /// Hands out the pre-acquired track of a kind, if any.
    pub fn take_pre_acquired(&mut self, kind: TrackKind) -> Option<LocalTrack> {
        match kind {
            TrackKind::Camera => self.pre_acquired_video_track.take(),
            TrackKind::Microphone => self.pre_acquired_audio_track.take(),
        }
    }

    /// Returns a track to its slot after it was unpublished; tracks stay
    /// live across publish cycles.
    pub fn store_pre_acquired(&mut self, track: LocalTrack) -> Result<(), SessionError> {
        let slot = match track.kind {
            TrackKind::Camera => &mut self.pre_acquired_video_track,
            TrackKind::Microphone => &mut self.pre_acquired_audio_track,
        };
        if slot.is_some() {
            return Err(SessionError::Media {
                message: format!("slot for {:?} is already occupied", track.kind),
            });
        }
        *slot = Some(track);
        Ok(())
    }
}
