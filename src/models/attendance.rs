// src/models/attendance.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

string_enum! {
    AttendanceStatus {
        Present => "present",
        Late => "late",
        Absent => "absent",
    }
}

/// Represents the 'attendance' collection.
///
/// `date` is the local calendar day (`YYYY-MM-DD`) and `time` the local
/// wall-clock time (`HH:MM`) at which the scan completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub date: String,
    pub time: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: String,
    pub student_name: String,
    pub date: String,
    pub time: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Equality filters for listing attendance. Results are ordered by date,
/// then time, both descending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFilter {
    pub student_id: Option<String>,
    pub date: Option<String>,
    pub limit: Option<i64>,
}

/// DTO for a front-desk entry made by an admin, e.g. marking an absence.
///
/// `code` is either the student code or the card barcode.
#[derive(Debug, Deserialize, Validate)]
pub struct ManualAttendanceRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    pub status: AttendanceStatus,
    /// Defaults to today.
    pub date: Option<chrono::NaiveDate>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}
