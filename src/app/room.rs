use std::io::IsTerminal;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::args::ViewerArgs;
use crate::chat::{
    ChatEvent, ChatFrame, OutboundChat, commands, spawn_chat_relay,
};
use crate::error::{AppError, AppResult, SessionError, ValidationError};
use crate::feed::{
    Backoff, FeedEvent, chat_relay_url, spawn_state_feed, state_feed_url,
};
use crate::session::{
    LocalTrack, MediaEndpoint, RoomEvent, Roster, SYSTEM_IDENTITY, SessionContext, TalkGate,
    TrackKind, display_name_from, room_events_from_chat,
};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::timeline::{CaptionUpdate, LINGER_DURATION, Timeline};
use crate::token;
use crate::ui::input::{InputEvent, spawn_input_reader};
use crate::ui::model::{ChatLine, RosterLine, UiData};
use crate::ui::render::{bar_placement, headless_position, setup_render_ui};

/// Chat rows kept in memory.
const CHAT_LOG_CAP: usize = 200;

/// Media seam for terminal sessions: the conferencing frontend owns devices,
/// so every operation reports that plainly instead of pretending.
struct DetachedMediaEndpoint;

#[async_trait]
impl MediaEndpoint for DetachedMediaEndpoint {
    async fn acquire(&self, _kind: TrackKind) -> Result<LocalTrack, SessionError> {
        Err(SessionError::Media {
            message: "terminal sessions leave media capture to the conferencing frontend"
                .to_owned(),
        })
    }

    async fn publish(&self, _track: &LocalTrack) -> Result<(), SessionError> {
        Err(SessionError::Media {
            message: "no media to publish from a terminal session".to_owned(),
        })
    }

    async fn unpublish(&self, _track: &LocalTrack) -> Result<(), SessionError> {
        Ok(())
    }
}

struct RoomSession {
    timeline: Timeline,
    roster: Roster,
    context: SessionContext,
    gate: TalkGate,
    ui: UiData,
    local_identity: String,
    local_name: String,
    terminal_size: (u16, u16),
    skip_step: u64,
}

impl RoomSession {
    fn sync_ui(&mut self) {
        self.ui.timeline = self.timeline.state().clone();
        self.ui.caption = self.timeline.caption_text().to_owned();
        self.ui.talk_blocked = TalkGate::blocked_by(&self.timeline.state().raw_status);
        self.ui.talk_engaged = self.gate.is_engaged();
        self.ui.participants = self.roster_lines();
    }

    fn roster_lines(&self) -> Vec<RosterLine> {
        let mut lines = Vec::with_capacity(self.roster.human_count());
        for participant in self.roster.humans() {
            let is_local = participant.identity == self.local_identity;
            lines.push(RosterLine {
                name: participant.display_name(),
                color: participant.color,
                is_local,
            });
        }
        // Local participant first, everyone else in roster order.
        lines.sort_by_key(|line| !line.is_local);
        lines
    }

    fn push_chat_line(&mut self, line: ChatLine) {
        self.ui.chat.push(line);
        let overflow = self.ui.chat.len().saturating_sub(CHAT_LOG_CAP);
        if overflow > 0 {
            self.ui.chat.drain(..overflow);
        }
    }

    fn push_system_line(&mut self, text: String) {
        self.push_chat_line(ChatLine {
            author: String::new(),
            text,
            color: None,
            system: true,
            timestamp: clock_stamp(),
        });
    }

    fn note_chat_frame(&mut self, frame: &ChatFrame) {
        let author = frame.from.clone().unwrap_or_default();
        let identity = author.identity.clone().unwrap_or_default();
        if identity == SYSTEM_IDENTITY {
            self.push_system_line(frame.message.clone());
            return;
        }

        let name = display_name_from(
            None,
            author.name.as_deref(),
            if identity.is_empty() {
                frame.author_label()
            } else {
                &identity
            },
        );
        let color = if identity.is_empty() {
            None
        } else {
            self.roster.color_of(&identity)
        };
        self.push_chat_line(ChatLine {
            author: name,
            text: frame.message.clone(),
            color,
            system: false,
            timestamp: clock_stamp(),
        });
    }
}

fn clock_stamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

/// Joins a room and runs the session until shutdown.
///
/// # Errors
///
/// Returns an error when required arguments are missing or endpoint
/// derivation fails; runtime socket failures are retried, not returned.
pub(crate) async fn run_room(args: &ViewerArgs) -> AppResult<()> {
    let server = args
        .server
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingServer))?;
    let access_token = args
        .token
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingToken))?;
    if let Some(name) = args.name.as_deref()
        && name.trim().is_empty()
    {
        return Err(AppError::validation(ValidationError::DisplayNameEmpty));
    }

    let grants = token::decode_token(access_token)?;
    let room = match args.room.clone() {
        Some(room) => room,
        None => grants
            .room()
            .map(str::to_owned)
            .ok_or_else(|| AppError::session(SessionError::TokenMissingRoom))?,
    };
    let local_identity = grants.identity().unwrap_or("you").to_owned();
    let local_name = args
        .name
        .clone()
        .or_else(|| grants.display_name().map(str::to_owned))
        .unwrap_or_else(|| local_identity.clone());

    let feed_url = state_feed_url(server, &room)?;
    let chat_url = chat_relay_url(server, &room)?;
    let backoff = Backoff::new(
        args.reconnect_initial
            .unwrap_or(crate::feed::DEFAULT_INITIAL_DELAY),
        args.reconnect_cap.unwrap_or(crate::feed::DEFAULT_DELAY_CAP),
    );

    info!("Joining room '{}' on {}", room, server);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let (feed_tx, mut feed_rx) = mpsc::channel::<FeedEvent>(64);
    let feed_handle = spawn_state_feed(feed_url, feed_tx, &shutdown_tx, backoff.clone());

    let (chat_tx, mut chat_rx) = mpsc::channel::<ChatEvent>(64);
    let (chat_handle, chat_task) = spawn_chat_relay(chat_url, chat_tx, &shutdown_tx, backoff);

    let (linger_tx, mut linger_rx) = mpsc::channel::<u64>(8);

    let ui_enabled = !args.no_ui && std::io::stdout().is_terminal();
    let mut session = RoomSession {
        timeline: Timeline::new(),
        roster: Roster::new(),
        context: SessionContext::new(),
        gate: TalkGate::new(),
        ui: UiData {
            room: room.clone(),
            no_color: args.no_color,
            ..UiData::default()
        },
        local_identity: local_identity.clone(),
        local_name,
        terminal_size: crossterm::terminal::size().unwrap_or((80, 24)),
        skip_step: args.skip_step,
    };
    session.roster.apply(&RoomEvent::ParticipantJoined {
        identity: local_identity,
        name: Some(session.local_name.clone()),
        metadata: None,
    });
    session.sync_ui();

    let (ui_tx, _) = watch::channel(session.ui.clone());
    let render_handle = if ui_enabled {
        setup_render_ui(&shutdown_tx, &ui_tx)
    } else {
        info!("UI disabled; logging state updates instead.");
        tokio::spawn(async {})
    };
    let (mut input_rx, input_handle) = if ui_enabled {
        spawn_input_reader(&shutdown_tx)
    } else {
        headless_input_stub(&shutdown_tx)
    };

    let endpoint = DetachedMediaEndpoint;
    // Matches the web client's join flow; with no media surface attached the
    // slots simply stay empty and push-to-talk reports why on use.
    session.context.pre_acquire(&endpoint).await;
    let mut shutdown_rx = shutdown_tx.subscribe();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = feed_rx.recv() => match event {
                Some(event) => {
                    handle_feed_event(&mut session, event, &linger_tx, ui_enabled);
                }
                None => break,
            },
            event = chat_rx.recv() => match event {
                Some(event) => handle_chat_event(&mut session, event),
                None => break,
            },
            generation = linger_rx.recv() => match generation {
                Some(generation) => {
                    if session.timeline.linger_elapsed(generation) {
                        session.sync_ui();
                    }
                }
                None => break,
            },
            event = input_rx.recv() => match event {
                Some(event) => {
                    let quit = handle_input_event(
                        &mut session,
                        event,
                        chat_handle.clone(),
                        &endpoint,
                    )
                    .await;
                    if quit {
                        break;
                    }
                }
                None => break,
            },
        }
        ui_tx.send_replace(session.ui.clone());
    }

    drop(shutdown_tx.send(()));
    session.roster.clear();
    let (_, _, _, _, _) = tokio::join!(
        signal_handle,
        feed_handle,
        chat_task,
        render_handle,
        input_handle
    );
    Ok(())
}

fn handle_feed_event(
    session: &mut RoomSession,
    event: FeedEvent,
    linger_tx: &mpsc::Sender<u64>,
    ui_enabled: bool,
) {
    match event {
        FeedEvent::Connected => {
            session.ui.feed_connected = true;
        }
        FeedEvent::Frame(frame) => {
            session.ui.feed_seen = true;
            let update = session.timeline.apply(&frame);
            if let CaptionUpdate::LingerStarted { generation } = update {
                let linger_tx = linger_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(LINGER_DURATION).await;
                    drop(linger_tx.send(generation).await);
                });
            }
            session.sync_ui();
            if !ui_enabled {
                let state = session.timeline.state();
                info!(
                    "state: '{}' {} [{}]",
                    state.title,
                    headless_position(state.current_ms, state.total_ms),
                    if state.playing {
                        "playing"
                    } else {
                        state.raw_status.as_str()
                    },
                );
            }
        }
        FeedEvent::Disconnected { retry_in } => {
            session.ui.feed_connected = false;
            warn!("State feed down; timeline is stale. Retrying in {:?}.", retry_in);
        }
    }
}

fn handle_chat_event(session: &mut RoomSession, event: ChatEvent) {
    // Presence rides on the relay: joins, name changes, and relay loss all
    // arrive as normalized room events before the chat line itself lands.
    let room_events = room_events_from_chat(&event, &session.roster, &session.local_identity);
    for room_event in &room_events {
        session.roster.apply(room_event);
    }

    match event {
        ChatEvent::Connected => {
            session.ui.chat_connected = true;
        }
        ChatEvent::Message(frame) => {
            session.note_chat_frame(&frame);
        }
        ChatEvent::Disconnected { retry_in } => {
            session.ui.chat_connected = false;
            warn!("Chat relay down. Retrying in {:?}.", retry_in);
        }
    }
    session.sync_ui();
}

async fn handle_input_event(
    session: &mut RoomSession,
    event: InputEvent,
    chat: impl OutboundChat,
    endpoint: &dyn MediaEndpoint,
) -> bool {
    match event {
        InputEvent::Key(key) => handle_key(session, key, chat, endpoint).await,
        InputEvent::Mouse(mouse) => {
            handle_mouse(session, mouse, chat).await;
            false
        }
        InputEvent::Resize(columns, rows) => {
            session.terminal_size = (columns, rows);
            session.ui.hover = None;
            false
        }
    }
}

async fn handle_key(
    session: &mut RoomSession,
    key: KeyEvent,
    chat: impl OutboundChat,
    endpoint: &dyn MediaEndpoint,
) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let command = if session.timeline.state().playing {
                commands::PAUSE_COMMAND
            } else {
                commands::PLAY_COMMAND
            };
            send_chat(session, &chat, command.to_owned()).await;
        }
        KeyCode::Left => {
            let command = commands::back_command(session.skip_step);
            send_chat(session, &chat, command).await;
        }
        KeyCode::Right => {
            let command = commands::fwd_command(session.skip_step);
            send_chat(session, &chat, command).await;
        }
        KeyCode::Tab => toggle_talk(session, endpoint).await,
        KeyCode::Enter => {
            let text = session.ui.input.trim().to_owned();
            session.ui.input.clear();
            if !text.is_empty() {
                if commands::is_command(&text) {
                    info!("Sending transport command: {}", text);
                }
                send_chat(session, &chat, text).await;
            }
        }
        KeyCode::Backspace => {
            session.ui.input.pop();
        }
        KeyCode::Esc => {
            if session.ui.input.is_empty() {
                return true;
            }
            session.ui.input.clear();
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                session.ui.input.push(ch);
            }
        }
        KeyCode::Up
        | KeyCode::Down
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::BackTab
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => {}
    }
    false
}

async fn handle_mouse(session: &mut RoomSession, mouse: MouseEvent, chat: impl OutboundChat) {
    let (columns, rows) = session.terminal_size;
    let placement = bar_placement(columns, rows, session.timeline.state());
    let total_ms = session.timeline.state().total_ms;

    match mouse.kind {
        MouseEventKind::Moved => {
            session.ui.hover = placement.and_then(|(row, geometry)| {
                if mouse.row == row {
                    geometry.hover_at(mouse.column, total_ms)
                } else {
                    None
                }
            });
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let target = placement.and_then(|(row, geometry)| {
                if mouse.row == row {
                    geometry.time_at(mouse.column, total_ms)
                } else {
                    None
                }
            });
            session.ui.hover = None;
            if let Some(target_ms) = target {
                let command = commands::seek_command(target_ms);
                send_chat(session, &chat, command).await;
            }
        }
        MouseEventKind::Down(MouseButton::Right | MouseButton::Middle)
        | MouseEventKind::Up(_)
        | MouseEventKind::Drag(_)
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollUp
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => {}
    }
}

async fn send_chat(session: &mut RoomSession, chat: &impl OutboundChat, text: String) {
    if let Err(err) = chat.send(&text).await {
        warn!("Chat send failed: {}", err);
        session.push_system_line(format!("not sent: {err}"));
        return;
    }
    let color = session.roster.color_of(&session.local_identity);
    let author = session.local_name.clone();
    session.push_chat_line(ChatLine {
        author,
        text,
        color,
        system: false,
        timestamp: clock_stamp(),
    });
}

async fn toggle_talk(session: &mut RoomSession, endpoint: &dyn MediaEndpoint) {
    if session.gate.is_engaged() {
        if let Err(err) = session
            .gate
            .release(&mut session.context, endpoint)
            .await
        {
            warn!("Talk release failed: {}", err);
        }
    } else {
        let status = session.timeline.state().raw_status.clone();
        if let Err(err) = session
            .gate
            .engage(&mut session.context, endpoint, &status)
            .await
        {
            session.push_system_line(format!("push-to-talk: {err}"));
        }
    }
    session.ui.talk_engaged = session.gate.is_engaged();
}

fn headless_input_stub(
    shutdown_tx: &crate::shutdown::ShutdownSender,
) -> (mpsc::Receiver<InputEvent>, tokio::task::JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::channel(1);
    let mut shutdown_rx = shutdown_tx.subscribe();
    let task = tokio::spawn(async move {
        // Keeps the sender alive so the input arm stays pending.
        let _keep = events_tx;
        drop(shutdown_rx.recv().await);
    });
    (events_rx, task)
}
