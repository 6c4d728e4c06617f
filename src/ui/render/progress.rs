use ratatui::prelude::text;
use ratatui::text::Span;

use crate::timeline::{BarGeometry, TimelineState, timecode::format_ms};
use crate::ui::model::UiRenderData;

use super::theme::{ACCENT_PROGRESS_RGB, DIM_TEXT_RGB, LIVE_RGB, PANEL_TEXT_RGB, rgb, style_color};

/// Rows the timeline panel occupies above the input line.
pub(crate) const TIMELINE_PANEL_ROWS: u16 = 3;
/// Narrower bars than this stop rendering entirely.
const MIN_BAR_WIDTH: u16 = 8;
/// Minimum terminal height for the timeline panel to appear.
const MIN_ROWS: u16 = 8;

/// Placement of the scrubbable bar for the current terminal size: the row it
/// is drawn on plus its horizontal extent. `None` while nothing is loaded or
/// the terminal is too small; the panel is suppressed entirely then.
pub fn bar_placement(columns: u16, rows: u16, state: &TimelineState) -> Option<(u16, BarGeometry)> {
    if !state.has_tape() || rows < MIN_ROWS {
        return None;
    }
    let left_label = label_width(state.current_ms);
    let right_label = label_width(state.total_ms);
    // "<current> [<bar>] <total>"
    let overhead = left_label
        .saturating_add(right_label)
        .saturating_add(4);
    let width = columns.saturating_sub(overhead);
    if width < MIN_BAR_WIDTH {
        return None;
    }
    let row = rows.saturating_sub(TIMELINE_PANEL_ROWS);
    Some((
        row,
        BarGeometry {
            left: left_label.saturating_add(2),
            width,
        },
    ))
}

fn label_width(ms: u64) -> u16 {
    u16::try_from(format_ms(ms).len()).unwrap_or(8)
}

/// The three timeline panel lines: title, bar, status.
pub(super) fn timeline_lines(
    data: &UiRenderData,
    columns: u16,
    rows: u16,
) -> Vec<text::Line<'static>> {
    let mut lines = Vec::with_capacity(3);
    lines.push(title_line(data));
    match bar_placement(columns, rows, &data.timeline) {
        Some((_, geometry)) => lines.push(bar_line(data, geometry)),
        None => lines.push(text::Line::from("")),
    }
    lines.push(status_line(data));
    lines
}

fn title_line(data: &UiRenderData) -> text::Line<'static> {
    let title = if data.timeline.title.is_empty() {
        "(untitled tape)".to_owned()
    } else {
        data.timeline.title.clone()
    };
    text::Line::from(Span::styled(
        title,
        style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
    ))
}

fn bar_line(data: &UiRenderData, geometry: BarGeometry) -> text::Line<'static> {
    let state = &data.timeline;
    let bar_width = usize::from(geometry.width);
    let total_eighths = u64::try_from(bar_width).unwrap_or(u64::MAX).saturating_mul(8);
    let filled_eighths = state.progress_scaled(total_eighths);
    let full_blocks = usize::try_from(filled_eighths.checked_div(8).unwrap_or(0)).unwrap_or(0);
    let rem = usize::try_from(filled_eighths.checked_rem(8).unwrap_or(0)).unwrap_or(0);
    let partial = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉"];
    let full_count = full_blocks.min(bar_width);
    let partial_block = partial.get(rem).copied().unwrap_or("");
    let partial_count = usize::from(rem > 0 && full_count < bar_width);
    let hover_cell = data
        .hover
        .and_then(|preview| preview.column.checked_sub(geometry.left).map(usize::from));

    let mut spans = Vec::with_capacity(bar_width.saturating_add(4));
    spans.push(Span::styled(
        format!("{} ", format_ms(state.current_ms)),
        style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
    ));
    spans.push(Span::raw("["));
    for idx in 0..bar_width {
        if hover_cell == Some(idx) {
            spans.push(Span::styled(
                "┃",
                style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
            ));
            continue;
        }
        if idx < full_count {
            spans.push(Span::styled(
                "█",
                style_color(data.no_color, rgb(ACCENT_PROGRESS_RGB)),
            ));
            continue;
        }
        if partial_count == 1 && idx == full_count {
            spans.push(Span::styled(
                partial_block.to_owned(),
                style_color(data.no_color, rgb(ACCENT_PROGRESS_RGB)),
            ));
            continue;
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("] "));
    spans.push(Span::styled(
        format_ms(state.total_ms),
        style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
    ));
    text::Line::from(spans)
}

fn status_line(data: &UiRenderData) -> text::Line<'static> {
    let mut spans = Vec::with_capacity(4);
    if data.timeline.playing {
        spans.push(Span::styled(
            "● LIVE",
            style_color(data.no_color, rgb(LIVE_RGB)),
        ));
    } else {
        spans.push(Span::styled(
            "● PAUSED",
            style_color(data.no_color, rgb(DIM_TEXT_RGB)),
        ));
    }
    if let Some(preview) = data.hover {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("seek → {}", format_ms(preview.time_ms)),
            style_color(data.no_color, rgb(PANEL_TEXT_RGB)),
        ));
    }
    text::Line::from(spans)
}
