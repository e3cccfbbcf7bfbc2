// src/attendance/clock.rs

use chrono::{DateTime, FixedOffset, Local, NaiveTime, Timelike};

use crate::config::LATE_FROM_HOUR;
use crate::models::attendance::AttendanceStatus;

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Arrivals from 08:00 local time on are late.
pub fn classify_arrival(time: NaiveTime) -> AttendanceStatus {
    if time.hour() >= LATE_FROM_HOUR {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Calendar day key, `YYYY-MM-DD`.
pub fn date_key(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Wall-clock key, `HH:MM`.
pub fn time_key(now: &DateTime<FixedOffset>) -> String {
    now.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_oclock_is_the_late_boundary() {
        let before = NaiveTime::from_hms_opt(7, 59, 59).unwrap();
        let at = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(classify_arrival(before), AttendanceStatus::Present);
        assert_eq!(classify_arrival(at), AttendanceStatus::Late);
        assert_eq!(
            classify_arrival(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            AttendanceStatus::Present
        );
        assert_eq!(
            classify_arrival(NaiveTime::from_hms_opt(23, 59, 0).unwrap()),
            AttendanceStatus::Late
        );
    }
}
