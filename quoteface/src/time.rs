//! Time keeping helpers

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Size of a Current Time Service record
pub const CTS_LEN: usize = 10;

/// Convert a UNIX timestamp to a UTC date time.
pub fn from_epoch(secs: i64) -> Result<NaiveDateTime, Error> {
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.naive_utc())
        .ok_or(Error::OutOfRange)
}

/// Decode a Bluetooth Current Time Service record.
///
/// Layout: year (u16 LE), month, day, hours, minutes, seconds, day of week,
/// fractions of 1/256 s, adjust reason.
pub fn from_cts_bytes(bytes: &[u8]) -> Result<NaiveDateTime, Error> {
    if bytes.len() < CTS_LEN {
        return Err(Error::Truncated);
    }
    let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
    let month = bytes[2] as u32;
    let day = bytes[3] as u32;
    let hour = bytes[4] as u32;
    let min = bytes[5] as u32;
    let sec = bytes[6] as u32;
    // Convert fractions_256 to milliseconds
    let milli = bytes[8] as u32 * 1000 / 256;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
        .ok_or(Error::InvalidDate)
}

/// Shift a UTC time into the local time zone.
pub fn to_local(utc: NaiveDateTime, utc_offset_secs: i32) -> NaiveDateTime {
    utc + Duration::seconds(utc_offset_secs as i64)
}

/// Detects minute boundaries of a clock that is sampled more often.
#[derive(Debug, Default)]
pub struct MinuteClock {
    last: Option<(NaiveDate, u32, u32)>,
}

impl MinuteClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true on the first sample and whenever the minute changed.
    pub fn tick(&mut self, now: &NaiveDateTime) -> bool {
        let current = (now.date(), now.hour(), now.minute());
        if self.last == Some(current) {
            return false;
        }
        self.last = Some(current);
        true
    }

    /// Force the next sample to report a change, e.g. after the time was set.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Truncated,
    InvalidDate,
    OutOfRange,
}
