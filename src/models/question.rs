// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

string_enum! {
    QuestionType {
        MultipleChoice => "multiple_choice",
        Essay => "essay",
        FillBlank => "fill_blank",
    }
}

string_enum! {
    Difficulty {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
}

/// Represents the 'questions' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,

    /// The question text.
    pub question: String,

    /// Choices for multiple-choice questions.
    /// Stored as a JSON array in the database.
    pub options: Option<Vec<String>>,

    /// The correct answer. For multiple choice this is the option text.
    pub correct_answer: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub category: String,
    pub grade: String,
    pub difficulty: Difficulty,
    pub points: i64,
}

impl Question {
    /// Essays need a human grader; everything else is checked by matching.
    pub fn is_auto_graded(&self) -> bool {
        self.question_type != QuestionType::Essay
    }

    /// Multiple choice is matched exactly, fill-in-the-blank ignores case
    /// and surrounding whitespace.
    pub fn accepts(&self, answer: &str) -> bool {
        match self.question_type {
            QuestionType::MultipleChoice => answer == self.correct_answer,
            QuestionType::FillBlank => answer
                .trim()
                .eq_ignore_ascii_case(self.correct_answer.trim()),
            QuestionType::Essay => false,
        }
    }
}

/// DTO for sending a question to a student (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub options: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub points: i64,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
            question_type: q.question_type,
            points: q.points,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_choices))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    pub options: Option<Vec<String>>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(custom(function = crate::models::material::validate_category))]
    pub category: String,
    #[validate(custom(function = crate::models::student::validate_grade))]
    pub grade: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 100))]
    pub points: i64,
}

/// Optional filters for listing questions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub grade: Option<String>,
}

fn validate_choices(req: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    if req.question_type != QuestionType::MultipleChoice {
        return Ok(());
    }
    let options = match &req.options {
        Some(options) if options.len() >= 2 => options,
        _ => return Err(validator::ValidationError::new("options_cannot_be_empty")),
    };
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    if !options.contains(&req.correct_answer) {
        return Err(validator::ValidationError::new("answer_not_in_options"));
    }
    Ok(())
}
