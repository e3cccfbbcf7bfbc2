// src/models/student.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::PHONE_RE;

string_enum! {
    StudentStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

/// Grades served by the tutoring programme.
pub const GRADES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// Class assigned when registration leaves it blank.
pub const DEFAULT_CLASS: &str = "4";

/// Represents the 'students' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    /// Owning user account.
    pub user_id: String,
    pub name: String,
    /// Human readable code, e.g. `SD2024001`.
    pub student_id: String,
    /// Unique attendance token printed on the student card.
    pub barcode: String,
    pub class: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub join_date: chrono::DateTime<chrono::Utc>,
    pub status: StudentStatus,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub user_id: String,
    pub name: String,
    pub student_id: String,
    pub barcode: String,
    pub class: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub status: StudentStatus,
}

/// DTO for an admin editing a student. Fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = validate_grade))]
    pub class: Option<String>,
    #[validate(length(max = 100))]
    pub parent_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid."))]
    pub parent_phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub status: Option<StudentStatus>,
}

impl UpdateStudentRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.class.is_none()
            && self.parent_name.is_none()
            && self.parent_phone.is_none()
            && self.birth_date.is_none()
            && self.status.is_none()
    }
}

/// DTO for an admin enrolling a student with a login account.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateStudentRequest {
    #[validate(nested)]
    #[serde(flatten)]
    pub account: crate::models::user::RegisterRequest,
    pub birth_date: Option<chrono::NaiveDate>,
}

pub fn validate_grade(grade: &str) -> Result<(), validator::ValidationError> {
    if !GRADES.contains(&grade) {
        return Err(validator::ValidationError::new("unknown_grade"));
    }
    Ok(())
}
