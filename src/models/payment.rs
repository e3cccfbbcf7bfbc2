// src/models/payment.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

string_enum! {
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
    }
}

pub const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Represents the 'payments' collection. One row per billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    /// 1..=12
    pub month: u32,
    pub year: i32,
    /// Rupiah.
    pub amount: i64,
    pub status: PaymentStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn month_name(&self) -> &'static str {
        MONTHS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}

/// DTO for billing a student for a month.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, max = 50))]
    pub student_id: String,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: String,
    pub student_name: String,
    pub month: u32,
    pub year: i32,
    pub amount: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    pub student_id: Option<String>,
    pub status: Option<PaymentStatus>,
}
