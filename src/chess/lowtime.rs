use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

pub const DEFAULT_LOW_TIME_SECONDS: u32 = 30;

/// Rewrites a game's raw text before it is written out.
pub trait LowTimeTransform {
    fn trim(&self, raw: &str) -> String;
}

// One move token with its optional move number ("12. " or "12... ") and the
// comment right after it.
static MOVE_WITH_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d+\.(?:\.\.)? )?\S+ \{([^}]*)\}\s?").expect("valid move pattern")
});

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%clk (\d+):(\d{1,2}):(\d{1,2})(?:\.\d+)?\]").expect("valid clock pattern")
});

/// Seconds left on the clock from a `[%clk H:MM:SS]` comment, if present.
///
/// `None` also when the value does not fit in a `u64`.
pub fn clock_seconds(comment: &str) -> Option<u64> {
    let caps = CLOCK.captures(comment)?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

/// Drops every move played with less than `min_seconds` left on the mover's
/// clock, together with its move number and clock comment. Moves without a
/// clock comment are kept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClockTrim {
    pub min_seconds: u32,
}

impl Default for ClockTrim {
    fn default() -> Self {
        Self {
            min_seconds: DEFAULT_LOW_TIME_SECONDS,
        }
    }
}

impl ClockTrim {
    pub fn new(min_seconds: u32) -> Self {
        Self { min_seconds }
    }

    fn is_low(&self, comment: &str) -> bool {
        clock_seconds(comment).is_some_and(|left| left < u64::from(self.min_seconds))
    }

    fn trim_cow<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if !raw.contains("[%clk") {
            return Cow::Borrowed(raw);
        }
        MOVE_WITH_COMMENT.replace_all(raw, |caps: &Captures<'_>| {
            if self.is_low(&caps[1]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
    }
}

impl LowTimeTransform for ClockTrim {
    fn trim(&self, raw: &str) -> String {
        self.trim_cow(raw).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "[Event \"Rated Blitz game\"]\n[Result \"1-0\"]\n\n";

    #[test]
    fn test_clock_seconds_parsing() {
        assert_eq!(clock_seconds(" [%clk 0:03:00] "), Some(180));
        assert_eq!(clock_seconds(" [%eval 0.25] [%clk 1:30:43] "), Some(5443));
        assert_eq!(clock_seconds(" [%clk 0:00:09.5] "), Some(9));
        assert_eq!(clock_seconds(" just a comment "), None);
    }

    #[test]
    fn test_clock_seconds_out_of_range_hours() {
        assert_eq!(clock_seconds(" [%clk 9999999999999999:00:00] "), None);
        assert_eq!(clock_seconds(" [%clk 99999999999999999999999:00:00] "), None);
        assert_eq!(
            clock_seconds(" [%clk 5124095576030431:00:00] "),
            Some(18_446_744_073_709_551_600)
        );
    }

    #[test]
    fn test_out_of_range_clock_keeps_the_move() {
        let raw = format!(
            "{HEADER}1. e4 {{ [%clk 9999999999999999:00:00] }} 1... e5 {{ [%clk 0:00:05] }} 1-0\n\n"
        );
        let expected = format!("{HEADER}1. e4 {{ [%clk 9999999999999999:00:00] }} 1-0\n\n");
        assert_eq!(ClockTrim::default().trim(&raw), expected);
    }

    #[test]
    fn test_removes_moves_below_threshold() {
        let raw = format!(
            "{HEADER}1. e4 {{ [%clk 0:00:45] }} 1... e5 {{ [%clk 0:00:29] }} 2. Qh5 {{ [%clk 0:00:30] }} 2... Nc6 {{ [%clk 0:00:03] }} 1-0\n\n"
        );
        let expected = format!(
            "{HEADER}1. e4 {{ [%clk 0:00:45] }} 2. Qh5 {{ [%clk 0:00:30] }} 1-0\n\n"
        );

        assert_eq!(ClockTrim::default().trim(&raw), expected);
    }

    #[test]
    fn test_keeps_text_without_clocks() {
        let raw = format!("{HEADER}1. e4 e5 2. Nf3 {{ good }} Nc6 1-0\n\n");
        assert_eq!(ClockTrim::default().trim(&raw), raw);
    }

    #[test]
    fn test_keeps_everything_at_or_above_threshold() {
        let raw = format!(
            "{HEADER}1. d4 {{ [%clk 0:10:00] }} 1... d5 {{ [%clk 0:09:58] }} 1-0\n\n"
        );
        assert_eq!(ClockTrim::new(30).trim(&raw), raw);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let raw = format!(
            "{HEADER}1. d4 {{ [%clk 0:00:50] }} 1... d5 {{ [%clk 0:01:10] }} 1-0\n\n"
        );
        let expected = format!("{HEADER}1... d5 {{ [%clk 0:01:10] }} 1-0\n\n");
        assert_eq!(ClockTrim::new(60).trim(&raw), expected);
        assert_eq!(ClockTrim::new(0).trim(&raw), raw);
    }

    #[test]
    fn test_eval_and_clock_comment_is_trimmed() {
        let raw = format!(
            "{HEADER}1. e4 {{ [%eval 0.2] [%clk 0:00:10] }} 1... c5 {{ [%eval 0.3] [%clk 0:00:40] }} 1-0\n\n"
        );
        let expected = format!("{HEADER}1... c5 {{ [%eval 0.3] [%clk 0:00:40] }} 1-0\n\n");
        assert_eq!(ClockTrim::default().trim(&raw), expected);
    }

    #[test]
    fn test_headers_are_never_touched() {
        let raw = "[Event \"Rated Bullet game\"]\n[TimeControl \"15+0\"]\n\n1. e4 { [%clk 0:00:05] } 1-0\n\n";
        let trimmed = ClockTrim::default().trim(raw);
        assert!(trimmed.starts_with("[Event \"Rated Bullet game\"]\n[TimeControl \"15+0\"]\n\n"));
        assert!(trimmed.ends_with("1-0\n\n"));
        assert!(!trimmed.contains("e4"));
    }
}
