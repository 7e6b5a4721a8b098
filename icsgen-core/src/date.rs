//! Partial ISO 8601 event dates.
//!
//! Accepted shape: `YYYY[-]MM[-]DDThh[:mm][:ss][:ff][±hh[:mm]]`, where the
//! year may be replaced by the literal `--` ("no year"). The whole string
//! has to match.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::error::{IcsGenError, IcsGenResult};

/// A UTC offset token such as `+02:00` or `-05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    pub negative: bool,
    pub hours: u32,
    pub minutes: u32,
}

impl UtcOffset {
    pub fn seconds(&self) -> i32 {
        let magnitude = (self.hours * 3_600 + self.minutes * 60) as i32;
        if self.negative { -magnitude } else { magnitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Two-digit fraction group, in hundredths of a second
    pub fraction: Option<u32>,
    pub offset: Option<UtcOffset>,
}

struct Cursor<'a> {
    rest: &'a [u8],
}

impl Cursor<'_> {
    fn eat(&mut self, byte: u8) -> bool {
        match self.rest.split_first() {
            Some((&first, tail)) if first == byte => {
                self.rest = tail;
                true
            }
            _ => false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.rest.first().copied()
    }

    /// Exactly `n` ASCII digits.
    fn digits(&mut self, n: usize) -> Option<u32> {
        if self.rest.len() < n || !self.rest[..n].iter().all(u8::is_ascii_digit) {
            return None;
        }
        let value = self.rest[..n]
            .iter()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'));
        self.rest = &self.rest[n..];
        Some(value)
    }

    /// `:` followed by two digits in `0..=max`, if present.
    fn colon_group(&mut self, max: u32) -> Result<Option<u32>, ()> {
        if !self.eat(b':') {
            return Ok(None);
        }
        match self.digits(2) {
            Some(value) if value <= max => Ok(Some(value)),
            _ => Err(()),
        }
    }
}

impl PartialDate {
    /// Parse a full partial-ISO-8601 date, or `None` if it does not match.
    pub fn parse(input: &str) -> Option<Self> {
        let mut cursor = Cursor {
            rest: input.as_bytes(),
        };

        let year = if cursor.eat(b'-') {
            if !cursor.eat(b'-') {
                return None;
            }
            None
        } else {
            let year = cursor.digits(4)? as i32;
            cursor.eat(b'-');
            Some(year)
        };

        let month = cursor.digits(2).filter(|m| (1..=12).contains(m))?;
        cursor.eat(b'-');
        let day = cursor.digits(2).filter(|d| (1..=31).contains(d))?;

        if !cursor.eat(b'T') {
            return None;
        }
        let hour = cursor.digits(2).filter(|h| *h <= 23)?;
        let minute = cursor.colon_group(59).ok()?;
        let second = minute.and(cursor.colon_group(60).ok()?);
        let fraction = second.and(cursor.colon_group(99).ok()?);

        let offset = match cursor.peek() {
            Some(sign @ (b'+' | b'-')) => {
                cursor.rest = &cursor.rest[1..];
                let hours = cursor.digits(2).filter(|h| *h <= 23)?;
                let minutes = cursor.colon_group(59).ok()?.unwrap_or(0);
                Some(UtcOffset {
                    negative: sign == b'-',
                    hours,
                    minutes,
                })
            }
            _ => None,
        };

        if !cursor.rest.is_empty() {
            return None;
        }

        // Without a year, accept any day that exists in a leap year.
        let check_year = year.unwrap_or(2000);
        NaiveDate::from_ymd_opt(check_year, month, day)?;

        Some(PartialDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
            fraction,
            offset,
        })
    }

    /// The calendar day as written, before any offset is applied. A missing
    /// year is taken from `default_year`.
    pub fn local_date(&self, default_year: i32) -> IcsGenResult<NaiveDate> {
        let year = self.year.unwrap_or(default_year);
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            IcsGenError::Date(format!(
                "{:02}-{:02} does not exist in {}",
                self.month, self.day, year
            ))
        })
    }

    /// Resolve to a UTC instant. A missing year is taken from `default_year`;
    /// a missing offset means the time is already UTC.
    pub fn start_instant(&self, default_year: i32) -> IcsGenResult<DateTime<Utc>> {
        let date = self.local_date(default_year)?;

        let second = self.second.unwrap_or(0).min(59);
        let millis = self.fraction.unwrap_or(0) * 10;
        let time = NaiveTime::from_hms_milli_opt(self.hour, self.minute.unwrap_or(0), second, millis)
            .ok_or_else(|| IcsGenError::Date(format!("invalid time of day in {:?}", self)))?;

        let offset_seconds = self.offset.map(|o| o.seconds()).unwrap_or(0);
        let offset = FixedOffset::east_opt(offset_seconds)
            .ok_or_else(|| IcsGenError::Date(format!("invalid UTC offset in {:?}", self)))?;

        date.and_time(time)
            .and_local_timezone(offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| IcsGenError::Date(format!("ambiguous local time in {:?}", self)))
    }
}
