/// Horizontal extent of the drawn progress bar, in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    pub left: u16,
    pub width: u16,
}

/// Tooltip state while the pointer rests over the bar. Display only; hover
/// never sends anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverPreview {
    pub column: u16,
    pub time_ms: u64,
}

impl BarGeometry {
    pub fn contains(&self, column: u16) -> bool {
        self.width > 0
            && column >= self.left
            && column < self.left.saturating_add(self.width)
    }

    /// Maps a column to a tape position: the fraction of the bar to the
    /// left of the column, clamped to `[0, 1]`, scaled by the tape length.
    /// `None` when the bar is degenerate or nothing is loaded.
    pub fn time_at(&self, column: u16, total_ms: u64) -> Option<u64> {
        if self.width == 0 || total_ms == 0 {
            return None;
        }
        let offset = u64::from(column.saturating_sub(self.left)).min(u64::from(self.width));
        let target = u128::from(offset)
            .saturating_mul(u128::from(total_ms))
            .checked_div(u128::from(self.width))
            .unwrap_or(0);
        Some(u64::try_from(target).unwrap_or(u64::MAX))
    }

    /// Hover tooltip for a pointer position, or `None` when the pointer is
    /// off the bar or nothing is loaded.
    pub fn hover_at(&self, column: u16, total_ms: u64) -> Option<HoverPreview> {
        if !self.contains(column) {
            return None;
        }
        self.time_at(column, total_ms)
            .map(|time_ms| HoverPreview { column, time_ms })
    }
}
