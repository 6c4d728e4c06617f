//! Tape position formatting: `MM:SS` under an hour, `HH:MM:SS` beyond,
//! floor-division throughout.

const MS_PER_SEC: u64 = 1_000;
const SECS_PER_MIN: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;

pub fn format_ms(ms: u64) -> String {
    let total_secs = ms.checked_div(MS_PER_SEC).unwrap_or(0);
    let hours = total_secs.checked_div(SECS_PER_HOUR).unwrap_or(0);
    let minutes = total_secs
        .checked_rem(SECS_PER_HOUR)
        .unwrap_or(0)
        .checked_div(SECS_PER_MIN)
        .unwrap_or(0);
    let secs = total_secs.checked_rem(SECS_PER_MIN).unwrap_or(0);

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_ms;
    use crate::error::{AppResult, ValidationError};

    #[test]
    fn formats_short_and_long_positions() -> AppResult<()> {
        let cases = [
            (0, "00:00"),
            (999, "00:00"),
            (65_000, "01:05"),
            (600_000, "10:00"),
            (3_599_999, "59:59"),
            (3_600_000, "01:00:00"),
            (3_661_000, "01:01:01"),
            (36_061_000, "10:01:01"),
        ];
        for (ms, expected) in cases {
            let formatted = format_ms(ms);
            if formatted != expected {
                return Err(ValidationError::from(format!(
                    "format_ms({ms}) = '{formatted}', expected '{expected}'"
                ))
                .into());
            }
        }
        Ok(())
    }
}
