use ratatui::style::{Color, Modifier, Style};

/// Tape-red progress fill, matching the room's accent.
pub(super) const ACCENT_PROGRESS_RGB: (u8, u8, u8) = (255, 64, 64);
pub(super) const PANEL_TEXT_RGB: (u8, u8, u8) = (222, 222, 222);
pub(super) const DIM_TEXT_RGB: (u8, u8, u8) = (140, 140, 140);
pub(super) const LIVE_RGB: (u8, u8, u8) = (64, 220, 64);
pub(super) const OSD_RGB: (u8, u8, u8) = (245, 245, 245);
pub(super) const SYSTEM_TEXT_RGB: (u8, u8, u8) = (150, 150, 170);

pub(super) const fn rgb(value: (u8, u8, u8)) -> Color {
    Color::Rgb(value.0, value.1, value.2)
}

pub(super) fn style_color(no_color: bool, color: Color) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().fg(color)
    }
}

pub(super) fn osd_style(no_color: bool) -> Style {
    let style = style_color(no_color, rgb(OSD_RGB));
    style.add_modifier(Modifier::BOLD)
}
