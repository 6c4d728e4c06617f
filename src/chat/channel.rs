use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::error::ChatError;
use crate::feed::Backoff;
use crate::shutdown::ShutdownSender;

use super::wire::{ChatFrame, decode_chat, encode_outbound};

/// Events delivered by the chat relay task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Connected,
    Message(ChatFrame),
    Disconnected { retry_in: Duration },
}

/// Anything that can carry a chat line out of the client. The timeline and
/// transport controls only ever see this seam, never the socket.
#[async_trait]
pub trait OutboundChat: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the channel is gone.
    async fn send(&self, text: &str) -> Result<(), ChatError>;
}

/// Cloneable handle feeding the relay task's outbound queue.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    outbound_tx: mpsc::Sender<String>,
}

#[async_trait]
impl OutboundChat for ChatHandle {
    async fn send(&self, text: &str) -> Result<(), ChatError> {
        self.outbound_tx
            .send(text.to_owned())
            .await
            .map_err(|_err| ChatError::NotConnected)
    }
}

/// Spawns the chat relay task and returns the outbound handle. Inbound
/// payloads arrive as [`ChatEvent`]s; outbound lines are JSON-encoded and
/// written to the socket. Reconnects like the state feed; outbound lines
/// submitted while disconnected are dropped with a warning.
#[must_use]
pub fn spawn_chat_relay(
    endpoint: Url,
    events_tx: mpsc::Sender<ChatEvent>,
    shutdown_tx: &ShutdownSender,
    backoff: Backoff,
) -> (ChatHandle, tokio::task::JoinHandle<()>) {
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(64);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let task = tokio::spawn(async move {
        let mut backoff = backoff;
        loop {
            let connect = tokio::select! {
                _ = shutdown_rx.recv() => return,
                result = connect_async(endpoint.as_str()) => result,
            };

            match connect {
                Ok((mut stream, _)) => {
                    backoff.reset();
                    tracing::info!("Chat relay connected: {}", endpoint);
                    if events_tx.send(ChatEvent::Connected).await.is_err() {
                        return;
                    }

                    loop {
                        tokio::select! {
                            _ = shutdown_rx.recv() => {
                                drop(stream.close(None).await);
                                return;
                            }
                            outbound = outbound_rx.recv() => match outbound {
                                Some(text) => match encode_outbound(&text) {
                                    Ok(payload) => {
                                        if let Err(err) = stream.send(Message::Text(payload)).await {
                                            tracing::warn!("Chat send failed: {}", err);
                                            break;
                                        }
                                    }
                                    Err(err) => {
                                        tracing::warn!("Dropping unencodable chat line: {}", err);
                                    }
                                },
                                None => {
                                    drop(stream.close(None).await);
                                    return;
                                }
                            },
                            message = stream.next() => match message {
                                Some(Ok(Message::Text(text))) => match decode_chat(&text) {
                                    Ok(frame) => {
                                        if events_tx.send(ChatEvent::Message(frame)).await.is_err() {
                                            return;
                                        }
                                    }
                                    Err(err) => {
                                        tracing::warn!("Skipping malformed chat payload: {}", err);
                                    }
                                },
                                Some(Ok(
                                    Message::Binary(_)
                                    | Message::Ping(_)
                                    | Message::Pong(_)
                                    | Message::Frame(_),
                                )) => {}
                                Some(Ok(Message::Close(_))) | None => {
                                    tracing::info!("Chat relay closed by the server.");
                                    break;
                                }
                                Some(Err(err)) => {
                                    tracing::warn!("Chat relay socket error: {}", err);
                                    break;
                                }
                            },
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("Chat relay connect failed: {}", err);
                }
            }

            // Drain lines queued while the socket was down rather than
            // replaying stale commands after the reconnect.
            while outbound_rx.try_recv().is_ok() {
                tracing::warn!("Dropping chat line queued while disconnected.");
            }

            let retry_in = backoff.next_delay();
            if events_tx
                .send(ChatEvent::Disconnected { retry_in })
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
    });

    (ChatHandle { outbound_tx }, task)
}
