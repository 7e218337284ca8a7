//! Small shared helpers.

use chrono::Local;

/// How [`current_date`] renders today's date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `2026-08-23`
    Dashed,
    /// `08/23/2026`
    Slashed,
    /// `08232026`
    Compact,
}

impl DateFormat {
    /// Map a separator character to a format, `None` for anything else
    #[must_use]
    pub const fn from_separator(separator: char) -> Option<Self> {
        match separator {
            '-' => Some(Self::Dashed),
            '/' => Some(Self::Slashed),
            _ => None,
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::Dashed => "%Y-%m-%d",
            Self::Slashed => "%m/%d/%Y",
            Self::Compact => "%m%d%Y",
        }
    }
}

/// Today's local date in the given format, for date-stamped form input
#[must_use]
pub fn current_date(format: DateFormat) -> String {
    Local::now().format(format.pattern()).to_string()
}
