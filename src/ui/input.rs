use std::time::Duration;

use crossterm::event::{Event, KeyEvent, MouseEvent, poll, read};
use tokio::sync::{broadcast, mpsc};

use crate::shutdown::ShutdownSender;

/// Polling interval for the blocking event reader.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Raw input queue depth; bursts beyond this block the reader briefly.
const INPUT_QUEUE_DEPTH: usize = 256;

/// Raw terminal input forwarded to the session loop, which owns the state
/// needed to interpret it.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Spawns the blocking input reader. Ends on shutdown or when the receiver
/// is dropped.
#[must_use]
pub fn spawn_input_reader(
    shutdown_tx: &ShutdownSender,
) -> (mpsc::Receiver<InputEvent>, tokio::task::JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::channel(INPUT_QUEUE_DEPTH);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let task = tokio::task::spawn_blocking(move || {
        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(broadcast::error::TryRecvError::Closed) => break,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }

            let has_event = poll(INPUT_POLL_INTERVAL).unwrap_or_default();
            if !has_event {
                continue;
            }

            let forwarded = match read() {
                Ok(Event::Key(key)) => events_tx.blocking_send(InputEvent::Key(key)),
                Ok(Event::Mouse(mouse)) => events_tx.blocking_send(InputEvent::Mouse(mouse)),
                Ok(Event::Resize(columns, rows)) => {
                    events_tx.blocking_send(InputEvent::Resize(columns, rows))
                }
                Ok(Event::FocusGained | Event::FocusLost | Event::Paste(_)) => Ok(()),
                Err(err) => {
                    tracing::warn!("Input read failed: {}", err);
                    continue;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
    });

    (events_rx, task)
}
