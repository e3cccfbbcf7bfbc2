// src/repository/attendance.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, clamp_limit, format_ts, new_id};
use crate::models::attendance::{AttendanceFilter, AttendanceRecord, NewAttendance};

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: String,
    student_id: String,
    student_name: String,
    date: String,
    time: String,
    status: String,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = RepoError;

    fn try_from(row: AttendanceRow) -> RepoResult<Self> {
        let p = RowParser::new("attendance", &row.id);
        p.date("date", &row.date)?;
        Ok(AttendanceRecord {
            status: p.enumeration("status", &row.status)?,
            created_at: p.timestamp("created_at", &row.created_at)?,
            id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            date: row.date,
            time: row.time,
            notes: row.notes,
        })
    }
}

impl Repository {
    /// Appends an attendance record.
    ///
    /// Nothing here stops a second record for the same student and day.
    pub async fn create_attendance(&self, data: NewAttendance) -> RepoResult<String> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO attendance (id, student_id, student_name, date, time, status, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.student_id)
        .bind(&data.student_name)
        .bind(&data.date)
        .bind(&data.time)
        .bind(data.status.as_str())
        .bind(&data.notes)
        .bind(format_ts(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_attendance(&self, id: &str) -> RepoResult<Option<AttendanceRecord>> {
        let row: Option<AttendanceRow> = sqlx::query_as(
            "SELECT id, student_id, student_name, date, time, status, notes, created_at \
             FROM attendance WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    /// Most recent first: date descending, then time descending.
    pub async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, student_id, student_name, date, time, status, notes, created_at \
             FROM attendance WHERE 1 = 1",
        );
        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(date) = &filter.date {
            qb.push(" AND date = ").push_bind(date);
        }
        qb.push(" ORDER BY date DESC, time DESC, created_at DESC LIMIT ")
            .push_bind(clamp_limit(filter.limit, 100));

        let rows: Vec<AttendanceRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    /// Records whose date falls in `[from, to]` (inclusive, `YYYY-MM-DD`).
    pub async fn list_attendance_between(
        &self,
        from: &str,
        to: &str,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(
            "SELECT id, student_id, student_name, date, time, status, notes, created_at \
             FROM attendance WHERE date >= ? AND date <= ? ORDER BY date DESC, time DESC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }
}
