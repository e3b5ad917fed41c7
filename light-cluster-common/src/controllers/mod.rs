//! Controllers hold the state behind the card and its editor
use std::fmt::{Display, Formatter};

pub mod card;
pub mod editor;

/// The lifecycle of a controller
#[derive(std::cmp::Eq, std::cmp::PartialEq, Copy, Clone, Debug)]
pub enum Phase {
    /// No configuration has been set yet.
    Unconfigured,

    /// A valid configuration has been set.
    Configured,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Unconfigured => write!(f, "Unconfigured"),
            Phase::Configured => write!(f, "Configured"),
        }
    }
}

/// Parse the leading integer of a string, the way a slider reports its value.
///
/// Leading whitespace and a sign are allowed, and parsing stops at the first
/// character that is not a digit, so `"12.7"` is 12 and `"12abc"` is 12.
/// Returns `None` if there are no digits.
#[must_use]
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number: i64 = digits[..end].parse().ok()?;

    Some(if negative { -number } else { number })
}
