// src/repository/questions.rs

use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, new_id};
use crate::models::question::{CreateQuestionRequest, Question, QuestionFilter};

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: String,
    question: String,
    options: Option<String>,
    correct_answer: String,
    #[sqlx(rename = "type")]
    question_type: String,
    category: String,
    grade: String,
    difficulty: String,
    points: i64,
}

impl TryFrom<QuestionRow> for Question {
    type Error = RepoError;

    fn try_from(row: QuestionRow) -> RepoResult<Self> {
        let p = RowParser::new("questions", &row.id);
        Ok(Question {
            options: row
                .options
                .as_deref()
                .map(|o| p.json::<Vec<String>>("options", o))
                .transpose()?,
            question_type: p.enumeration("type", &row.question_type)?,
            difficulty: p.enumeration("difficulty", &row.difficulty)?,
            points: p.non_negative("points", row.points)?,
            id: row.id,
            question: row.question,
            correct_answer: row.correct_answer,
            category: row.category,
            grade: row.grade,
        })
    }
}

const QUESTION_COLUMNS: &str = "SELECT id, question, options, correct_answer, type, category, \
     grade, difficulty, points FROM questions";

impl Repository {
    pub async fn create_question(&self, data: &CreateQuestionRequest) -> RepoResult<String> {
        let id = new_id();
        let options = data
            .options
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepoError::Malformed {
                collection: "questions",
                id: id.clone(),
                reason: format!("options: {}", e),
            })?;

        sqlx::query(
            r#"
            INSERT INTO questions
            (id, question, options, correct_answer, type, category, grade, difficulty, points)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.question)
        .bind(options)
        .bind(&data.correct_answer)
        .bind(data.question_type.as_str())
        .bind(&data.category)
        .bind(&data.grade)
        .bind(data.difficulty.as_str())
        .bind(data.points)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_question(&self, id: &str) -> RepoResult<Option<Question>> {
        let row: Option<QuestionRow> = sqlx::query_as(&format!("{} WHERE id = ?", QUESTION_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Question::try_from).transpose()
    }

    pub async fn list_questions(&self, filter: &QuestionFilter) -> RepoResult<Vec<Question>> {
        let mut qb = QueryBuilder::<Sqlite>::new(QUESTION_COLUMNS);
        qb.push(" WHERE 1 = 1");
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        if let Some(grade) = &filter.grade {
            qb.push(" AND grade = ").push_bind(grade);
        }
        qb.push(" ORDER BY rowid ASC");

        let rows: Vec<QuestionRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Question::try_from).collect()
    }

    /// Fetches the given questions, in the order of `ids`. Unknown ids are
    /// skipped.
    pub async fn questions_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Use QueryBuilder for dynamic IN clause
        let mut qb = QueryBuilder::<Sqlite>::new(QUESTION_COLUMNS);
        qb.push(" WHERE id IN (");
        let mut separated = qb.separated(",");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<QuestionRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut questions = rows
            .into_iter()
            .map(Question::try_from)
            .collect::<RepoResult<Vec<_>>>()?;
        questions.sort_by_key(|q| ids.iter().position(|id| *id == q.id));
        Ok(questions)
    }
}
