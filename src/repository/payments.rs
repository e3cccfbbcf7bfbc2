// src/repository/payments.rs

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, format_ts, new_id};
use crate::models::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: String,
    student_id: String,
    student_name: String,
    month: i64,
    year: i64,
    amount: i64,
    status: String,
    paid_at: Option<String>,
    notes: Option<String>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepoError;

    fn try_from(row: PaymentRow) -> RepoResult<Self> {
        let p = RowParser::new("payments", &row.id);
        let month = match u32::try_from(row.month) {
            Ok(m @ 1..=12) => m,
            _ => {
                return Err(RepoError::Malformed {
                    collection: "payments",
                    id: row.id,
                    reason: format!("month: {} out of range", row.month),
                });
            }
        };
        let status: PaymentStatus = p.enumeration("status", &row.status)?;
        let paid_at = p.opt_timestamp("paid_at", row.paid_at.as_deref())?;
        if status == PaymentStatus::Paid && paid_at.is_none() {
            return Err(RepoError::Malformed {
                collection: "payments",
                id: row.id,
                reason: "paid_at: missing on a paid payment".to_string(),
            });
        }
        Ok(Payment {
            year: i32::try_from(row.year).map_err(|_| RepoError::Malformed {
                collection: "payments",
                id: row.id.clone(),
                reason: format!("year: {} out of range", row.year),
            })?,
            amount: p.non_negative("amount", row.amount)?,
            id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            month,
            status,
            paid_at,
            notes: row.notes,
        })
    }
}

const PAYMENT_COLUMNS: &str = "SELECT id, student_id, student_name, month, year, amount, status, \
     paid_at, notes FROM payments";

impl Repository {
    /// Bills a period; new payments start out pending.
    pub async fn create_payment(&self, data: NewPayment) -> RepoResult<String> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO payments (id, student_id, student_name, month, year, amount, status, paid_at, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.student_id)
        .bind(&data.student_name)
        .bind(data.month)
        .bind(data.year)
        .bind(data.amount)
        .bind(PaymentStatus::Pending.as_str())
        .bind(&data.notes)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_payment(&self, id: &str) -> RepoResult<Option<Payment>> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{} WHERE id = ?", PAYMENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Payment::try_from).transpose()
    }

    /// Latest billing period first.
    pub async fn list_payments(&self, filter: &PaymentFilter) -> RepoResult<Vec<Payment>> {
        let mut qb = QueryBuilder::<Sqlite>::new(PAYMENT_COLUMNS);
        qb.push(" WHERE 1 = 1");
        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY year DESC, month DESC, student_name ASC");

        let rows: Vec<PaymentRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Payment::try_from).collect()
    }

    /// Moves a payment between pending and paid. Paying stamps `paid_at`
    /// with `at`; reverting to pending clears it.
    pub async fn set_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Payment>> {
        let paid_at = match status {
            PaymentStatus::Paid => Some(format_ts(at)),
            PaymentStatus::Pending => None,
        };

        let result = sqlx::query("UPDATE payments SET status = ?, paid_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(paid_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_payment(id).await
    }

    pub async fn count_payments(&self, status: PaymentStatus) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
