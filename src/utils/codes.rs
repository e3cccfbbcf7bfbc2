// src/utils/codes.rs

//! Identifiers printed on student cards.

use std::sync::LazyLock;

use regex::Regex;

static STUDENT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SD[0-9]{6,7}$").expect("student code pattern is valid"));

static BARCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NRG[0-9A-Z]{4,20}$").expect("barcode pattern is valid"));

/// `SD` followed by the last six digits of the epoch milliseconds.
pub fn student_code(epoch_millis: i64) -> String {
    format!("SD{:06}", epoch_millis.rem_euclid(1_000_000))
}

/// `NRG`, the epoch milliseconds in base 36, and four random characters.
pub fn barcode(epoch_millis: i64) -> String {
    let random: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect();
    format!(
        "NRG{}{}",
        to_base36(epoch_millis.unsigned_abs()),
        random.to_ascii_uppercase()
    )
}

pub fn is_student_code(code: &str) -> bool {
    STUDENT_CODE_RE.is_match(code)
}

pub fn is_barcode(code: &str) -> bool {
    BARCODE_RE.is_match(code)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
