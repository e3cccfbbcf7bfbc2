// src/repository/students.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, format_ts, new_id};
use crate::models::student::{NewStudent, Student, StudentStatus, UpdateStudentRequest};

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: String,
    user_id: String,
    name: String,
    student_id: String,
    barcode: String,
    class: String,
    parent_name: String,
    parent_phone: String,
    birth_date: Option<String>,
    join_date: String,
    status: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = RepoError;

    fn try_from(row: StudentRow) -> RepoResult<Self> {
        let p = RowParser::new("students", &row.id);
        if row.barcode.is_empty() {
            return Err(RepoError::Malformed {
                collection: "students",
                id: row.id,
                reason: "barcode: empty".to_string(),
            });
        }
        Ok(Student {
            birth_date: row
                .birth_date
                .as_deref()
                .map(|d| p.date("birth_date", d))
                .transpose()?,
            join_date: p.timestamp("join_date", &row.join_date)?,
            status: p.enumeration("status", &row.status)?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            student_id: row.student_id,
            barcode: row.barcode,
            class: row.class,
            parent_name: row.parent_name,
            parent_phone: row.parent_phone,
        })
    }
}

const STUDENT_COLUMNS: &str = "SELECT id, user_id, name, student_id, barcode, class, \
     parent_name, parent_phone, birth_date, join_date, status FROM students";

impl Repository {
    pub async fn create_student(&self, data: NewStudent) -> RepoResult<String> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO students
            (id, user_id, name, student_id, barcode, class, parent_name, parent_phone,
             birth_date, join_date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.user_id)
        .bind(&data.name)
        .bind(&data.student_id)
        .bind(&data.barcode)
        .bind(&data.class)
        .bind(&data.parent_name)
        .bind(&data.parent_phone)
        .bind(data.birth_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(format_ts(Utc::now()))
        .bind(data.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_student(&self, id: &str) -> RepoResult<Option<Student>> {
        self.find_student_where("id", id).await
    }

    pub async fn get_student_by_user(&self, user_id: &str) -> RepoResult<Option<Student>> {
        self.find_student_where("user_id", user_id).await
    }

    /// Looks a student up by the human readable code, e.g. `SD2024001`.
    pub async fn get_student_by_code(&self, student_id: &str) -> RepoResult<Option<Student>> {
        self.find_student_where("student_id", student_id).await
    }

    pub async fn get_student_by_barcode(&self, barcode: &str) -> RepoResult<Option<Student>> {
        self.find_student_where("barcode", barcode).await
    }

    async fn find_student_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> RepoResult<Option<Student>> {
        let row: Option<StudentRow> =
            sqlx::query_as(&format!("{} WHERE {} = ?", STUDENT_COLUMNS, column))
                .bind(value)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Student::try_from).transpose()
    }

    /// Lists students ordered by their code, optionally restricted to a class.
    pub async fn list_students(&self, class: Option<&str>) -> RepoResult<Vec<Student>> {
        let mut qb = QueryBuilder::<Sqlite>::new(STUDENT_COLUMNS);
        if let Some(class) = class {
            qb.push(" WHERE class = ").push_bind(class);
        }
        qb.push(" ORDER BY student_id ASC");

        let rows: Vec<StudentRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Student::try_from).collect()
    }

    /// Applies the present fields of an admin edit. Returns `None` when the
    /// student does not exist.
    pub async fn update_student(
        &self,
        id: &str,
        changes: &UpdateStudentRequest,
    ) -> RepoResult<Option<Student>> {
        if !changes.is_empty() {
            let mut qb = QueryBuilder::<Sqlite>::new("UPDATE students SET ");
            let mut set = qb.separated(", ");
            if let Some(name) = &changes.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(class) = &changes.class {
                set.push("class = ").push_bind_unseparated(class);
            }
            if let Some(parent_name) = &changes.parent_name {
                set.push("parent_name = ").push_bind_unseparated(parent_name);
            }
            if let Some(parent_phone) = &changes.parent_phone {
                set.push("parent_phone = ").push_bind_unseparated(parent_phone);
            }
            if let Some(birth_date) = changes.birth_date {
                set.push("birth_date = ")
                    .push_bind_unseparated(birth_date.format("%Y-%m-%d").to_string());
            }
            if let Some(status) = changes.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            qb.push(" WHERE id = ").push_bind(id);

            let result = qb.build().execute(&self.pool).await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }
        }

        self.get_student(id).await
    }

    pub async fn count_students(&self, status: Option<StudentStatus>) -> RepoResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students");
        if let Some(status) = status {
            qb.push(" WHERE status = ").push_bind(status.as_str());
        }
        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }
}
