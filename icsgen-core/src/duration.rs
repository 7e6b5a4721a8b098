//! Compact duration tokens such as `1d2h30m` or `45s`.
//!
//! A token is one or more `<digits><unit>` groups. Units are `d`, `h`, `m`
//! and `s`; each may appear at most once and only in that order, but the
//! first group may use any of them.

use std::fmt;

use serde::Serialize;

use crate::error::{IcsGenError, IcsGenResult};

const UNITS: [char; 4] = ['d', 'h', 'm', 's'];

/// Breakdown of a duration token. A field is `Some` only if its unit
/// appeared in the token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Duration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<i64>,
}

/// Split a token into `(unit, digits)` groups, or `None` if it does not
/// fully match the grammar.
fn scan(token: &str) -> Option<Vec<(char, &str)>> {
    let mut groups = Vec::new();
    let mut rest = token;
    let mut next_unit = 0;

    while !rest.is_empty() {
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return None;
        }

        let (digits, tail) = rest.split_at(digits_len);
        let unit = tail.chars().next()?;
        let rank = UNITS[next_unit..].iter().position(|u| *u == unit)? + next_unit;

        groups.push((unit, digits));
        next_unit = rank + 1;
        rest = &tail[unit.len_utf8()..];
    }

    if groups.is_empty() { None } else { Some(groups) }
}

/// Whether `token` fully matches the compact duration grammar.
pub fn is_duration_token(token: &str) -> bool {
    scan(token).is_some()
}

impl Duration {
    /// Parse a duration token into its unit breakdown.
    pub fn parse(token: &str) -> IcsGenResult<Self> {
        let groups = scan(token).ok_or_else(|| {
            IcsGenError::DurationDecode(format!(
                "'{}' does not decompose into unit groups (e.g. 1d2h30m)",
                token
            ))
        })?;

        let mut duration = Duration::default();
        for (unit, digits) in groups {
            let value: i64 = digits.parse().map_err(|_| {
                IcsGenError::DurationDecode(format!("'{}{}' in '{}' is out of range", digits, unit, token))
            })?;

            let slot = match unit {
                'd' => &mut duration.days,
                'h' => &mut duration.hours,
                'm' => &mut duration.minutes,
                _ => &mut duration.seconds,
            };
            *slot = Some(value);
        }

        Ok(duration)
    }
}

/// Renders the RFC 5545 `DURATION` value, e.g. `P1DT2H30M`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "P")?;
        if let Some(days) = self.days {
            write!(f, "{}D", days)?;
        }

        let has_time = self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some();
        if has_time || self.days.is_none() {
            write!(f, "T")?;
        }
        if let Some(hours) = self.hours {
            write!(f, "{}H", hours)?;
        }
        if let Some(minutes) = self.minutes {
            write!(f, "{}M", minutes)?;
        }
        if let Some(seconds) = self.seconds {
            write!(f, "{}S", seconds)?;
        }
        if !has_time && self.days.is_none() {
            write!(f, "0S")?;
        }
        Ok(())
    }
}
