mod lifecycle;
mod progress;
mod theme;

pub use lifecycle::setup_render_ui;
pub use progress::bar_placement;

use std::io;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    prelude::text,
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use crate::error::AppResult;
use crate::feed::status::STATUS_NO_TAPE;
use crate::timeline::timecode::format_ms;
use crate::ui::model::{ChatLine, RosterLine, UiRenderData};

use self::progress::{TIMELINE_PANEL_ROWS, timeline_lines};
use self::theme::{
    DIM_TEXT_RGB, LIVE_RGB, PANEL_TEXT_RGB, SYSTEM_TEXT_RGB, osd_style, rgb, style_color,
};

/// Side column width on a roomy terminal.
const SIDE_WIDTH: u16 = 32;
/// Terminals narrower than this drop the side column.
const SIDE_MIN_COLUMNS: u16 = 72;

pub struct UiTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

pub trait UiActions {
    /// Initializes the terminal for UI rendering.
    ///
    /// # Errors
    ///
    /// Returns an error when terminal setup fails.
    fn setup_terminal() -> AppResult<UiTerminal>;
    fn cleanup();
    fn render(terminal: &mut UiTerminal, data: &UiRenderData);
}

pub struct Ui;

impl UiActions for Ui {
    fn setup_terminal() -> AppResult<UiTerminal> {
        enable_raw_mode()?;
        if let Err(err) = execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        ) {
            disable_raw_mode().ok();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(UiTerminal { terminal })
    }

    fn cleanup() {
        disable_raw_mode().ok();
        execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )
        .ok();
    }

    fn render(terminal: &mut UiTerminal, data: &UiRenderData) {
        if let Err(err) = render_into(&mut terminal.terminal, data) {
            eprintln!("Failed to render UI: {}", err);
        }
    }
}

/// Renders one frame into any backend; tests drive it with `TestBackend`.
///
/// # Errors
///
/// Returns an error when the backend rejects the draw.
pub fn render_into<B: Backend>(terminal: &mut Terminal<B>, data: &UiRenderData) -> AppResult<()> {
    terminal.draw(|frame| {
        let size = frame.size();
        for (paragraph, rect) in build_widgets(data, size) {
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            frame.render_widget(paragraph, rect);
        }
    })?;
    Ok(())
}

fn build_widgets(data: &UiRenderData, size: Rect) -> Vec<(Paragraph<'static>, Rect)> {
    let mut widgets = Vec::with_capacity(6);
    if size.width < 20 || size.height < 6 {
        return widgets;
    }

    let columns = size.width;
    let rows = size.height;
    let timeline_visible = bar_placement(columns, rows, &data.timeline).is_some();
    let input_top = rows.saturating_sub(1);
    let panel_top = if timeline_visible {
        input_top.saturating_sub(TIMELINE_PANEL_ROWS)
    } else {
        input_top
    };
    let side_width = if columns >= SIDE_MIN_COLUMNS {
        SIDE_WIDTH
    } else {
        0
    };
    let stage_width = columns.saturating_sub(side_width);
    let middle_height = panel_top.saturating_sub(1);

    widgets.push((header(data), Rect::new(0, 0, columns, 1)));
    widgets.push((
        stage(data),
        Rect::new(0, 1, stage_width, middle_height),
    ));
    if side_width > 0 {
        let roster_height = roster_panel_height(&data.participants, middle_height);
        widgets.push((
            roster_panel(data),
            Rect::new(stage_width, 1, side_width, roster_height),
        ));
        widgets.push((
            chat_panel(data, middle_height.saturating_sub(roster_height)),
            Rect::new(
                stage_width,
                1_u16.saturating_add(roster_height),
                side_width,
                middle_height.saturating_sub(roster_height),
            ),
        ));
    }
    if timeline_visible {
        widgets.push((
            Paragraph::new(timeline_lines(data, columns, rows)),
            Rect::new(0, panel_top, columns, TIMELINE_PANEL_ROWS),
        ));
    }
    widgets.push((input_line(data, columns), Rect::new(0, input_top, columns, 1)));
    widgets
}

fn header(data: &UiRenderData) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        format!(" matinee ─ {} ", data.room),
        style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
    )];
    spans.push(connection_dot("feed", data.feed_connected, data.no_color));
    spans.push(Span::raw(" "));
    spans.push(connection_dot("chat", data.chat_connected, data.no_color));
    Paragraph::new(text::Line::from(spans))
}

fn connection_dot(label: &str, connected: bool, no_color: bool) -> Span<'static> {
    let color = if connected { LIVE_RGB } else { DIM_TEXT_RGB };
    Span::styled(format!("●{label}"), style_color(no_color, rgb(color)))
}

fn stage(data: &UiRenderData) -> Paragraph<'static> {
    let osd = if data.feed_seen {
        data.caption.clone()
    } else {
        STATUS_NO_TAPE.to_owned()
    };
    let mut lines = vec![
        text::Line::from(""),
        text::Line::from(Span::styled(format!("  {osd}"), osd_style(data.no_color))),
    ];
    if data.feed_seen && !data.feed_connected {
        lines.push(text::Line::from(Span::styled(
            "  (state feed reconnecting…)",
            style_color(data.no_color, rgb(DIM_TEXT_RGB)),
        )));
    }
    Paragraph::new(lines)
}

fn roster_panel_height(participants: &[RosterLine], middle_height: u16) -> u16 {
    let wanted = u16::try_from(participants.len()).unwrap_or(u16::MAX).saturating_add(2);
    wanted.clamp(3, middle_height.checked_div(2).unwrap_or(3).max(3))
}

fn roster_panel(data: &UiRenderData) -> Paragraph<'static> {
    let mut lines = Vec::with_capacity(data.participants.len());
    for entry in &data.participants {
        let style = entry.color.map_or_else(
            || style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
            |color| style_color(data.no_color, rgb(color)),
        );
        let suffix = if entry.is_local { " (you)" } else { "" };
        lines.push(text::Line::from(Span::styled(
            format!("{}{}", entry.name, suffix),
            style,
        )));
    }
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Participants ({})", data.participants.len())),
    )
}

fn chat_panel(data: &UiRenderData, height: u16) -> Paragraph<'static> {
    let visible = usize::from(height.saturating_sub(2)).max(1);
    let start = data.chat.len().saturating_sub(visible);
    let lines: Vec<text::Line<'static>> = data
        .chat
        .iter()
        .skip(start)
        .map(|entry| chat_line(entry, data.no_color))
        .collect();
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Chat"))
}

fn chat_line(entry: &ChatLine, no_color: bool) -> text::Line<'static> {
    if entry.system {
        return text::Line::from(Span::styled(
            format!("{} {}", entry.timestamp, entry.text),
            style_color(no_color, rgb(SYSTEM_TEXT_RGB)),
        ));
    }
    let author_style = entry.color.map_or_else(
        || style_color(no_color, rgb(PANEL_TEXT_RGB)),
        |color| style_color(no_color, rgb(color)),
    );
    text::Line::from(vec![
        Span::styled(
            format!("{} ", entry.timestamp),
            style_color(no_color, rgb(DIM_TEXT_RGB)),
        ),
        Span::styled(format!("{}: ", entry.author), author_style),
        Span::styled(
            entry.text.clone(),
            style_color(no_color, rgb(PANEL_TEXT_RGB)),
        ),
    ])
}

fn input_line(data: &UiRenderData, columns: u16) -> Paragraph<'static> {
    let talk = if data.talk_engaged {
        Span::styled("[ TALK ON ]", style_color(data.no_color, rgb(LIVE_RGB)))
    } else if data.talk_blocked {
        Span::styled(
            "[ talk blocked ]",
            style_color(data.no_color, rgb(DIM_TEXT_RGB)),
        )
    } else {
        Span::styled(
            "[ tab: talk ]",
            style_color(data.no_color, rgb(DIM_TEXT_RGB)),
        )
    };
    let prompt = format!("> {}", data.input);
    let pad = usize::from(columns)
        .saturating_sub(prompt.chars().count())
        .saturating_sub(talk.content.chars().count());
    text_line_paragraph(prompt, pad, talk, data.no_color)
}

fn text_line_paragraph(
    prompt: String,
    pad: usize,
    talk: Span<'static>,
    no_color: bool,
) -> Paragraph<'static> {
    let line = text::Line::from(vec![
        Span::styled(prompt, style_color(no_color, rgb(PANEL_TEXT_RGB))),
        Span::raw(" ".repeat(pad)),
        talk,
    ]);
    Paragraph::new(line)
}

/// Timecode pair shown by headless mode log lines.
pub fn headless_position(current_ms: u64, total_ms: u64) -> String {
    format!("{} / {}", format_ms(current_ms), format_ms(total_ms))
}
