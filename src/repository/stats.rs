// src/repository/stats.rs

use chrono::{DateTime, Utc};

use super::{RepoResult, Repository, format_ts};
use crate::models::payment::PaymentStatus;
use crate::models::report::DashboardStats;

impl Repository {
    /// Headline counters. `today` is the local calendar day.
    pub async fn dashboard_stats(&self, today: &str) -> RepoResult<DashboardStats> {
        let today_attendance: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE date = ?")
                .bind(today)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_students: self.count_students(None).await?,
            today_attendance,
            total_materials: self.count_materials().await?,
            total_exams: self.count_exams().await?,
            pending_payments: self.count_payments(PaymentStatus::Pending).await?,
        })
    }

    /// Sum of payments marked paid at or after `since`.
    pub async fn paid_revenue_since(&self, since: DateTime<Utc>) -> RepoResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount) FROM payments WHERE status = ? AND paid_at >= ?",
        )
        .bind(PaymentStatus::Paid.as_str())
        .bind(format_ts(since))
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Mean score over exam results completed at or after `since`, or zero
    /// when there are none.
    pub async fn average_exam_score_since(&self, since: DateTime<Utc>) -> RepoResult<f64> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(score) FROM exam_results WHERE completed_at >= ?")
                .bind(format_ts(since))
                .fetch_one(&self.pool)
                .await?;

        Ok(avg.unwrap_or(0.0))
    }
}
