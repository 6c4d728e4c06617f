use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::shutdown::ShutdownSender;

use super::backoff::Backoff;
use super::frame::{StateFrame, decode_frame};

/// Events delivered by the state feed task, in socket order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Connected,
    Frame(StateFrame),
    Disconnected { retry_in: Duration },
}

/// Spawns the state feed task: exactly one live socket at a time, frames
/// delivered in order, reconnecting with capped exponential backoff.
///
/// The task ends when the shutdown channel fires or the event receiver is
/// dropped; no events are delivered afterwards.
#[must_use]
pub fn spawn_state_feed(
    endpoint: Url,
    events_tx: mpsc::Sender<FeedEvent>,
    shutdown_tx: &ShutdownSender,
    backoff: Backoff,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut backoff = backoff;
        loop {
            let connect = tokio::select! {
                _ = shutdown_rx.recv() => return,
                result = connect_async(endpoint.as_str()) => result,
            };

            match connect {
                Ok((mut stream, _)) => {
                    backoff.reset();
                    tracing::info!("State feed connected: {}", endpoint);
                    if events_tx.send(FeedEvent::Connected).await.is_err() {
                        return;
                    }

                    loop {
                        let message = tokio::select! {
                            _ = shutdown_rx.recv() => {
                                drop(stream.close(None).await);
                                return;
                            }
                            message = stream.next() => message,
                        };
                        match message {
                            Some(Ok(Message::Text(text))) => match decode_frame(&text) {
                                Ok(frame) => {
                                    if events_tx.send(FeedEvent::Frame(frame)).await.is_err() {
                                        return;
                                    }
                                }
                                Err(err) => {
                                    tracing::warn!("Discarding malformed state frame: {}", err);
                                }
                            },
                            Some(Ok(
                                Message::Binary(_)
                                | Message::Ping(_)
                                | Message::Pong(_)
                                | Message::Frame(_),
                            )) => {}
                            Some(Ok(Message::Close(_))) | None => {
                                tracing::info!("State feed closed by the server.");
                                break;
                            }
                            Some(Err(err)) => {
                                tracing::warn!("State feed socket error: {}", err);
                                break;
                            }
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("State feed connect failed: {}", err);
                }
            }

            let retry_in = backoff.next_delay();
            if events_tx
                .send(FeedEvent::Disconnected { retry_in })
                .await
                .is_err()
            {
                return;
            }
            tokio::select! {
                _ = shutdown_rx.recv() => return,
                () = tokio::time::sleep(retry_in) => {}
            }
        }
    })
}
