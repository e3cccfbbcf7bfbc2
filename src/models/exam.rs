// src/models/exam.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

string_enum! {
    ExamStatus {
        Draft => "draft",
        Published => "published",
        Completed => "completed",
    }
}

/// Where `now` falls relative to an exam's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamPhase {
    Upcoming,
    Active,
    Closed,
}

/// Represents the 'exams' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ordered question ids, stored as a JSON array.
    pub question_ids: Vec<String>,
    /// Minutes.
    pub duration: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub grade: String,
    pub status: ExamStatus,
}

impl Exam {
    /// The window is half open: `[start_time, end_time)`.
    pub fn phase(&self, now: DateTime<Utc>) -> ExamPhase {
        if now < self.start_time {
            ExamPhase::Upcoming
        } else if now < self.end_time {
            ExamPhase::Active
        } else {
            ExamPhase::Closed
        }
    }

    /// Stored status adjusted for the clock: a published exam whose window
    /// has passed is reported as completed.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ExamStatus {
        match (self.status, self.phase(now)) {
            (ExamStatus::Published, ExamPhase::Closed) => ExamStatus::Completed,
            (status, _) => status,
        }
    }

    pub fn accepts_submissions(&self, now: DateTime<Utc>) -> bool {
        self.status == ExamStatus::Published && self.phase(now) == ExamPhase::Active
    }
}

/// One answer inside a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
}

/// Represents the 'exam_results' collection. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub student_name: String,
    pub answers: Vec<Answer>,
    pub score: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExamResult {
    pub exam_id: String,
    pub student_id: String,
    pub student_name: String,
    pub answers: Vec<Answer>,
    pub score: i64,
}

/// DTO for creating an exam.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_window))]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1, message = "An exam needs at least one question."))]
    pub question_ids: Vec<String>,
    #[validate(range(min = 1, max = 300))]
    pub duration: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(custom(function = crate::models::student::validate_grade))]
    pub grade: String,
    #[serde(default = "default_exam_status")]
    pub status: ExamStatus,
}

fn default_exam_status() -> ExamStatus {
    ExamStatus::Draft
}

fn validate_window(req: &CreateExamRequest) -> Result<(), validator::ValidationError> {
    if req.end_time <= req.start_time {
        return Err(validator::ValidationError::new("end_before_start"));
    }
    Ok(())
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    pub answers: Vec<Answer>,
}

/// Optional filters for listing exams, latest start first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamFilter {
    pub grade: Option<String>,
}

/// Scores a submission as a percentage of the auto-gradable points.
///
/// Returns `(correct_count, score)`. Unknown question ids are ignored and
/// a paper without gradable questions scores zero.
pub fn score_answers(
    questions: &[crate::models::question::Question],
    answers: &[Answer],
) -> (usize, i64) {
    let mut correct_count = 0;
    let mut earned = 0;
    let mut total = 0;

    for question in questions.iter().filter(|q| q.is_auto_graded()) {
        total += question.points;
        let given = answers
            .iter()
            .find(|a| a.question_id == question.id)
            .map(|a| a.answer.as_str());
        if let Some(given) = given {
            if question.accepts(given) {
                correct_count += 1;
                earned += question.points;
            }
        }
    }

    if total == 0 {
        return (correct_count, 0);
    }

    let score = (earned as f64 / total as f64 * 100.0).round() as i64;
    (correct_count, score)
}
