// src/models/report.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

/// Headline counters on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub today_attendance: i64,
    pub total_materials: i64,
    pub total_exams: i64,
    pub pending_payments: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Week,
    #[default]
    Month,
    Year,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAttendance {
    pub class: String,
    /// Present or late.
    pub attended: i64,
    pub absent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub period: ReportPeriod,
    /// First day covered, inclusive (`YYYY-MM-DD`).
    pub from: String,
    pub total_students: i64,
    pub active_students: i64,
    pub total_materials: i64,
    /// Sum of payments marked paid within the period.
    pub revenue: i64,
    /// Percentage of attendance records that are present or late.
    pub attendance_rate: f64,
    pub attendance_by_class: Vec<ClassAttendance>,
    pub average_exam_score: f64,
}

impl ReportPeriod {
    /// First day covered by the period, counting back from `today`.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        let days = match self {
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Year => 365,
        };
        today - Duration::days(days)
    }

    /// Local midnight starting the period, in `now`'s offset, as UTC.
    pub fn since(&self, now: DateTime<FixedOffset>) -> DateTime<Utc> {
        self.start(now.date_naive())
            .and_time(NaiveTime::MIN)
            .and_local_timezone(*now.offset())
            .single()
            .map_or_else(|| now.with_timezone(&Utc), |start| start.with_timezone(&Utc))
    }
}

/// Attendance rate as a percentage with one decimal, and per-class counts
/// sorted by class. `class_of` maps a student code to its class; unknown
/// codes are grouped under `"-"`.
pub fn summarize_attendance(
    records: &[AttendanceRecord],
    class_of: &HashMap<String, String>,
) -> (f64, Vec<ClassAttendance>) {
    let mut by_class: BTreeMap<String, ClassAttendance> = BTreeMap::new();
    let mut attended = 0;

    for record in records {
        let class = class_of
            .get(&record.student_id)
            .cloned()
            .unwrap_or_else(|| "-".to_string());
        let entry = by_class
            .entry(class.clone())
            .or_insert_with(|| ClassAttendance {
                class,
                attended: 0,
                absent: 0,
            });
        if record.status == AttendanceStatus::Absent {
            entry.absent += 1;
        } else {
            entry.attended += 1;
            attended += 1;
        }
    }

    let rate = if records.is_empty() {
        0.0
    } else {
        (attended as f64 / records.len() as f64 * 1000.0).round() / 10.0
    };
    (rate, by_class.into_values().collect())
}
