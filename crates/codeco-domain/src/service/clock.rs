//! Time source and control references
//!
//! The interchange and message references are derived from the time at which
//! a message is built, never from the operation time. Two messages built in
//! the same minute share their references; callers that need uniqueness
//! inject a clock that guarantees it.

use chrono::{NaiveDateTime, Utc};

/// Source of the "built at" timestamp
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// References and stamps shared by the segments of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlReferences {
    /// UNB/UNZ reference: sender + MMDD
    pub interchange: String,
    /// UNH/UNT reference: "COD" + MMDDHHMM
    pub message: String,
    /// MMDDHHMM, appended to the container number for the BGM document number
    pub stamp: String,
    /// UNB preparation date, YYMMDD
    pub date: String,
    /// UNB preparation time, HHMM
    pub time: String,
}

impl ControlReferences {
    pub fn derive(sender: &str, at: NaiveDateTime) -> Self {
        let month_day = at.format("%m%d").to_string();
        let stamp = at.format("%m%d%H%M").to_string();
        Self {
            interchange: format!("{}{}", sender, month_day),
            message: format!("COD{}", stamp),
            stamp,
            date: at.format("%y%m%d").to_string(),
            time: at.format("%H%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_derive_references() {
        let refs = ControlReferences::derive("MANTRA", at(2, 5, 14, 28));
        assert_eq!(refs.interchange, "MANTRA0205");
        assert_eq!(refs.message, "COD02051428");
        assert_eq!(refs.stamp, "02051428");
        assert_eq!(refs.date, "260205");
        assert_eq!(refs.time, "1428");
    }

    #[test]
    fn test_same_minute_collides() {
        let a = ControlReferences::derive("MANTRA", at(2, 5, 14, 28));
        let b = ControlReferences::derive(
            "MANTRA",
            at(2, 5, 14, 28) + chrono::Duration::seconds(59),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(at(12, 31, 23, 59));
        assert_eq!(clock.now(), at(12, 31, 23, 59));
        assert_eq!((&clock).now(), at(12, 31, 23, 59));
    }
}
