// src/repository/exams.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, format_ts, new_id};
use crate::models::exam::{CreateExamRequest, Exam, ExamFilter, ExamResult, NewExamResult};

#[derive(sqlx::FromRow)]
struct ExamRow {
    id: String,
    title: String,
    description: String,
    question_ids: String,
    duration: i64,
    start_time: String,
    end_time: String,
    grade: String,
    status: String,
}

impl TryFrom<ExamRow> for Exam {
    type Error = RepoError;

    fn try_from(row: ExamRow) -> RepoResult<Self> {
        let p = RowParser::new("exams", &row.id);
        Ok(Exam {
            question_ids: p.json("question_ids", &row.question_ids)?,
            duration: p.non_negative("duration", row.duration)?,
            start_time: p.timestamp("start_time", &row.start_time)?,
            end_time: p.timestamp("end_time", &row.end_time)?,
            status: p.enumeration("status", &row.status)?,
            id: row.id,
            title: row.title,
            description: row.description,
            grade: row.grade,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ExamResultRow {
    id: String,
    exam_id: String,
    student_id: String,
    student_name: String,
    answers: String,
    score: i64,
    completed_at: String,
}

impl TryFrom<ExamResultRow> for ExamResult {
    type Error = RepoError;

    fn try_from(row: ExamResultRow) -> RepoResult<Self> {
        let p = RowParser::new("exam_results", &row.id);
        Ok(ExamResult {
            answers: p.json("answers", &row.answers)?,
            score: p.non_negative("score", row.score)?,
            completed_at: p.timestamp("completed_at", &row.completed_at)?,
            id: row.id,
            exam_id: row.exam_id,
            student_id: row.student_id,
            student_name: row.student_name,
        })
    }
}

const EXAM_COLUMNS: &str = "SELECT id, title, description, question_ids, duration, start_time, \
     end_time, grade, status FROM exams";

const RESULT_COLUMNS: &str =
    "SELECT id, exam_id, student_id, student_name, answers, score, completed_at FROM exam_results";

impl Repository {
    pub async fn create_exam(&self, data: &CreateExamRequest) -> RepoResult<String> {
        let id = new_id();
        let question_ids =
            serde_json::to_string(&data.question_ids).map_err(|e| RepoError::Malformed {
                collection: "exams",
                id: id.clone(),
                reason: format!("question_ids: {}", e),
            })?;

        sqlx::query(
            r#"
            INSERT INTO exams
            (id, title, description, question_ids, duration, start_time, end_time, grade, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(question_ids)
        .bind(data.duration)
        .bind(format_ts(data.start_time))
        .bind(format_ts(data.end_time))
        .bind(&data.grade)
        .bind(data.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_exam(&self, id: &str) -> RepoResult<Option<Exam>> {
        let row: Option<ExamRow> = sqlx::query_as(&format!("{} WHERE id = ?", EXAM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Exam::try_from).transpose()
    }

    /// Latest start first.
    pub async fn list_exams(&self, filter: &ExamFilter) -> RepoResult<Vec<Exam>> {
        let mut qb = QueryBuilder::<Sqlite>::new(EXAM_COLUMNS);
        if let Some(grade) = &filter.grade {
            qb.push(" WHERE grade = ").push_bind(grade);
        }
        qb.push(" ORDER BY start_time DESC");

        let rows: Vec<ExamRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Exam::try_from).collect()
    }

    pub async fn count_exams(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Stores a result. A second result for the same exam and student is a
    /// [`RepoError::Conflict`].
    pub async fn create_exam_result(&self, data: NewExamResult) -> RepoResult<String> {
        let id = new_id();
        let answers = serde_json::to_string(&data.answers).map_err(|e| RepoError::Malformed {
            collection: "exam_results",
            id: id.clone(),
            reason: format!("answers: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO exam_results (id, exam_id, student_id, student_name, answers, score, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.exam_id)
        .bind(&data.student_id)
        .bind(&data.student_name)
        .bind(answers)
        .bind(data.score)
        .bind(format_ts(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// A student's results, most recently completed first.
    pub async fn list_student_results(&self, student_id: &str) -> RepoResult<Vec<ExamResult>> {
        let rows: Vec<ExamResultRow> = sqlx::query_as(&format!(
            "{} WHERE student_id = ? ORDER BY completed_at DESC",
            RESULT_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExamResult::try_from).collect()
    }

    pub async fn list_exam_results(&self, exam_id: Option<&str>) -> RepoResult<Vec<ExamResult>> {
        let mut qb = QueryBuilder::<Sqlite>::new(RESULT_COLUMNS);
        if let Some(exam_id) = exam_id {
            qb.push(" WHERE exam_id = ").push_bind(exam_id);
        }
        qb.push(" ORDER BY score DESC, completed_at ASC");

        let rows: Vec<ExamResultRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(ExamResult::try_from).collect()
    }
}
