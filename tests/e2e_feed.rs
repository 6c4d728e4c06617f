
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

use matinee::feed::{Backoff, FeedEvent, spawn_state_feed, state_feed_url};
use matinee::timeline::{CaptionUpdate, Timeline};

use support_feed::spawn_frame_server;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

async fn next_event(events_rx: &mut mpsc::Receiver<FeedEvent>) -> Result<FeedEvent, String> {
    timeout(EVENT_TIMEOUT, events_rx.recv())
        .await
        .map_err(|err| format!("timed out waiting for a feed event: {err}"))?
        .ok_or_else(|| "feed task ended early".to_owned())
}

fn test_backoff() -> Backoff {
    Backoff::new(Duration::from_millis(50), Duration::from_millis(200))
}

#[tokio::test]
async fn feed_delivers_frames_in_order() -> Result<(), String> {
    let frames = vec![
        "{\"Title\":\"Stalker\",\"PositionMs\":1000,\"LengthMs\":60000,\"Status\":\"⏵ PLAY\"}"
            .to_owned(),
        "not json at all".to_owned(),
        "{\"Title\":\"Stalker\",\"PositionMs\":2000,\"LengthMs\":60000,\"Status\":\"\"}".to_owned(),
    ];
    let server = spawn_frame_server(frames, Duration::from_millis(10)).await?;
    let endpoint = state_feed_url(&server.url(), "theater")
        .map_err(|err| format!("endpoint derivation failed: {err}"))?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let task = spawn_state_feed(endpoint, events_tx, &shutdown_tx, test_backoff());

    if next_event(&mut events_rx).await? != FeedEvent::Connected {
        return Err("expected Connected first".to_owned());
    }

    let mut timeline = Timeline::new();

    let first = next_event(&mut events_rx).await?;
    let FeedEvent::Frame(first_frame) = first else {
        return Err(format!("expected the first frame, got {first:?}"));
    };
    if first_frame.position_ms != 1_000 {
        return Err("frames out of order".to_owned());
    }
    timeline.apply(&first_frame);
    if timeline.caption_text() != "⏵ PLAY" {
        return Err("caption should show the label".to_owned());
    }

    // The malformed payload is skipped; the next event is the second frame.
    let second = next_event(&mut events_rx).await?;
    let FeedEvent::Frame(second_frame) = second else {
        return Err(format!("expected the second frame, got {second:?}"));
    };
    if second_frame.position_ms != 2_000 {
        return Err("malformed frame should have been dropped".to_owned());
    }
    let update = timeline.apply(&second_frame);
    if !matches!(update, CaptionUpdate::LingerStarted { .. }) {
        return Err("transition into playing should linger".to_owned());
    }
    if timeline.caption_text() != "⏵ PLAY" {
        return Err("caption must keep lingering on the old label".to_owned());
    }
    if !timeline.state().playing || timeline.state().current_ms != 2_000 {
        return Err("numeric fields must update immediately".to_owned());
    }

    drop(shutdown_tx.send(()));
    timeout(EVENT_TIMEOUT, task)
        .await
        .map_err(|err| format!("feed task did not stop: {err}"))?
        .map_err(|err| format!("feed task panicked: {err}"))?;
    server.stop();
    Ok(())
}

#[tokio::test]
async fn feed_reconnects_after_server_close() -> Result<(), String> {
    let frames =
        vec!["{\"Title\":\"t\",\"PositionMs\":1,\"LengthMs\":10,\"Status\":\"\"}".to_owned()];
    let server = spawn_frame_server(frames, Duration::from_millis(5)).await?;
    let endpoint = state_feed_url(&server.url(), "theater")
        .map_err(|err| format!("endpoint derivation failed: {err}"))?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let task = spawn_state_feed(endpoint, events_tx, &shutdown_tx, test_backoff());

    let mut connects = 0_u32;
    let mut disconnects = 0_u32;
    while connects < 2 {
        match next_event(&mut events_rx).await? {
            FeedEvent::Connected => connects += 1,
            FeedEvent::Disconnected { retry_in } => {
                disconnects += 1;
                if retry_in > Duration::from_millis(200) {
                    return Err(format!("retry delay exceeds the cap: {retry_in:?}"));
                }
            }
            FeedEvent::Frame(_) => {}
        }
    }
    if disconnects == 0 {
        return Err("expected at least one disconnect between connects".to_owned());
    }

    drop(shutdown_tx.send(()));
    timeout(EVENT_TIMEOUT, task)
        .await
        .map_err(|err| format!("feed task did not stop: {err}"))?
        .map_err(|err| format!("feed task panicked: {err}"))?;
    server.stop();
    Ok(())
}

#[tokio::test]
async fn feed_stops_cleanly_on_shutdown_while_connected() -> Result<(), String> {
    // A long gap keeps the connection open while shutdown fires.
    let frames =
        vec!["{\"Title\":\"t\",\"PositionMs\":1,\"LengthMs\":10,\"Status\":\"\"}".to_owned()];
    let server = spawn_frame_server(frames, Duration::from_secs(30)).await?;
    let endpoint = state_feed_url(&server.url(), "theater")
        .map_err(|err| format!("endpoint derivation failed: {err}"))?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let task = spawn_state_feed(endpoint, events_tx, &shutdown_tx, test_backoff());

    if next_event(&mut events_rx).await? != FeedEvent::Connected {
        return Err("expected Connected first".to_owned());
    }
    let first = next_event(&mut events_rx).await?;
    if !matches!(first, FeedEvent::Frame(_)) {
        return Err(format!("expected the first frame, got {first:?}"));
    }

    drop(shutdown_tx.send(()));
    timeout(EVENT_TIMEOUT, task)
        .await
        .map_err(|err| format!("feed task did not stop: {err}"))?
        .map_err(|err| format!("feed task panicked: {err}"))?;

    // The task is gone: the event channel closes without further updates.
    match timeout(EVENT_TIMEOUT, events_rx.recv()).await {
        Ok(None) => {}
        Ok(Some(event)) => return Err(format!("unexpected event after shutdown: {event:?}")),
        Err(err) => return Err(format!("event channel did not close: {err}")),
    }
    server.stop();
    Ok(())
}
