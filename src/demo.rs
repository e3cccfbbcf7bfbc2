// src/demo.rs

//! Bundled sample data shown when a list comes back empty or fails.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{
    attendance::{AttendanceRecord, AttendanceStatus},
    exam::{Exam, ExamResult, ExamStatus},
    game::GameScore,
    material::Material,
    payment::{Payment, PaymentStatus},
    question::{Difficulty, Question, QuestionType},
    report::{ClassAttendance, DashboardStats, Report, ReportPeriod},
    student::{Student, StudentStatus},
};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

struct DemoStudent {
    code: &'static str,
    name: &'static str,
    class: &'static str,
    parent: &'static str,
    phone: &'static str,
    status: StudentStatus,
    barcode: &'static str,
}

const DEMO_STUDENTS: [DemoStudent; 5] = [
    DemoStudent {
        code: "SD2024001",
        name: "Anisa Putri",
        class: "4",
        parent: "Ibu Sarah",
        phone: "08123456789",
        status: StudentStatus::Active,
        barcode: "NRG123ABC",
    },
    DemoStudent {
        code: "SD2024002",
        name: "Budi Santoso",
        class: "5",
        parent: "Pak Ahmad",
        phone: "08123456790",
        status: StudentStatus::Active,
        barcode: "NRG456DEF",
    },
    DemoStudent {
        code: "SD2024003",
        name: "Citra Dewi",
        class: "4",
        parent: "Ibu Dewi",
        phone: "08123456791",
        status: StudentStatus::Active,
        barcode: "NRG789GHI",
    },
    DemoStudent {
        code: "SD2024004",
        name: "Dani Pratama",
        class: "6",
        parent: "Pak Budi",
        phone: "08123456792",
        status: StudentStatus::Inactive,
        barcode: "NRG012JKL",
    },
    DemoStudent {
        code: "SD2024005",
        name: "Eka Putri",
        class: "5",
        parent: "Ibu Rina",
        phone: "08123456793",
        status: StudentStatus::Active,
        barcode: "NRG345MNO",
    },
];

pub fn students() -> Vec<Student> {
    DEMO_STUDENTS
        .iter()
        .enumerate()
        .map(|(i, row)| Student {
            id: (i + 1).to_string(),
            user_id: (i + 1).to_string(),
            name: row.name.to_string(),
            student_id: row.code.to_string(),
            barcode: row.barcode.to_string(),
            class: row.class.to_string(),
            parent_name: row.parent.to_string(),
            parent_phone: row.phone.to_string(),
            birth_date: None,
            join_date: epoch() - Duration::days(i as i64 + 1),
            status: row.status,
        })
        .collect()
}

/// Exams positioned around `now` so that some are open and one is upcoming.
pub fn exams(now: DateTime<Utc>) -> Vec<Exam> {
    let day = Duration::days(1);
    let ids = |n: usize| (1..=n).map(|i| i.to_string()).collect::<Vec<_>>();
    vec![
        Exam {
            id: "1".to_string(),
            title: "Ujian Matematika - Bab 1".to_string(),
            description: "Operasi Hitung Bilangan Bulat".to_string(),
            question_ids: ids(10),
            duration: 30,
            start_time: now - day,
            end_time: now + day * 7,
            grade: "4".to_string(),
            status: ExamStatus::Published,
        },
        Exam {
            id: "2".to_string(),
            title: "Ujian IPA - Makhluk Hidup".to_string(),
            description: "Ciri-ciri dan kebutuhan makhluk hidup".to_string(),
            question_ids: ids(5),
            duration: 20,
            start_time: now - day * 2,
            end_time: now + day * 5,
            grade: "4".to_string(),
            status: ExamStatus::Published,
        },
        Exam {
            id: "3".to_string(),
            title: "Ujian Bahasa Indonesia".to_string(),
            description: "Teks Naratif dan Cerita Rakyat".to_string(),
            question_ids: ids(8),
            duration: 25,
            start_time: now + day,
            end_time: now + day * 7,
            grade: "5".to_string(),
            status: ExamStatus::Published,
        },
    ]
}

pub fn exam_results(now: DateTime<Utc>) -> Vec<ExamResult> {
    vec![ExamResult {
        id: "1".to_string(),
        exam_id: "3".to_string(),
        student_id: "1".to_string(),
        student_name: "Test Student".to_string(),
        answers: Vec::new(),
        score: 85,
        completed_at: now - Duration::days(3),
    }]
}

pub fn leaderboard(now: DateTime<Utc>) -> Vec<GameScore> {
    let rows = [
        ("Anisa Putri", 1250),
        ("Budi Santoso", 1100),
        ("Citra Dewi", 980),
        ("Dani Pratama", 850),
        ("Eka Putri", 720),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, (name, score))| GameScore {
            id: (i + 1).to_string(),
            game_id: "math-challenge".to_string(),
            student_id: (i + 1).to_string(),
            student_name: name.to_string(),
            score,
            played_at: now,
        })
        .collect()
}

pub fn payments() -> Vec<Payment> {
    let paid = |d: u32| Utc.with_ymd_and_hms(2025, 1, d, 9, 0, 0).single();
    let rows = [
        ("SD2024101", "Ahmad Rizki", 150_000, paid(15)),
        ("SD2024102", "Siti Aisyah", 250_000, paid(14)),
        ("SD2024103", "Budi Santoso", 150_000, None),
        ("SD2024104", "Dewi Lestari", 400_000, paid(12)),
        ("SD2024105", "Eko Prasetyo", 250_000, None),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, (code, name, amount, paid_at))| Payment {
            id: (i + 1).to_string(),
            student_id: code.to_string(),
            student_name: name.to_string(),
            month: 1,
            year: 2025,
            amount,
            status: if paid_at.is_some() {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Pending
            },
            paid_at,
            notes: None,
        })
        .collect()
}

pub fn materials() -> Vec<Material> {
    let rows = [
        (
            "Penjumlahan Bilangan",
            "matematika",
            "4",
            "Belajar menjumlahkan bilangan ribuan.",
        ),
        (
            "Bagian Tubuh Tumbuhan",
            "ipa",
            "4",
            "Akar, batang, daun dan fungsinya.",
        ),
        (
            "Membaca Cerita Rakyat",
            "bahasa_indonesia",
            "5",
            "Memahami unsur intrinsik cerita.",
        ),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, (title, category, grade, description))| Material {
            id: (i + 1).to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: format!("<p>{}</p>", description),
            images: Vec::new(),
            category: category.to_string(),
            grade: grade.to_string(),
            author: "Tim Narang".to_string(),
            created_at: epoch(),
            updated_at: epoch(),
        })
        .collect()
}

pub fn questions() -> Vec<Question> {
    vec![
        Question {
            id: "1".to_string(),
            question: "Berapa hasil 125 + 375?".to_string(),
            options: Some(vec![
                "400".to_string(),
                "500".to_string(),
                "600".to_string(),
                "450".to_string(),
            ]),
            correct_answer: "500".to_string(),
            question_type: QuestionType::MultipleChoice,
            category: "matematika".to_string(),
            grade: "4".to_string(),
            difficulty: Difficulty::Easy,
            points: 10,
        },
        Question {
            id: "2".to_string(),
            question: "Bagian tumbuhan yang menyerap air adalah ...".to_string(),
            options: None,
            correct_answer: "akar".to_string(),
            question_type: QuestionType::FillBlank,
            category: "ipa".to_string(),
            grade: "4".to_string(),
            difficulty: Difficulty::Easy,
            points: 10,
        },
    ]
}

/// A day's check-ins for the admin attendance view.
pub fn attendance(date: &str) -> Vec<AttendanceRecord> {
    let rows = [
        ("SD2024001", "Anisa Putri", "07:45", AttendanceStatus::Present),
        ("SD2024002", "Budi Santoso", "07:50", AttendanceStatus::Present),
        ("SD2024003", "Citra Dewi", "08:10", AttendanceStatus::Late),
        ("SD2024005", "Eka Putri", "-", AttendanceStatus::Absent),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, (code, name, time, status))| AttendanceRecord {
            id: (i + 1).to_string(),
            student_id: code.to_string(),
            student_name: name.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            status,
            notes: None,
            created_at: epoch(),
        })
        .collect()
}

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_students: 124,
        today_attendance: 95,
        total_materials: 48,
        total_exams: 12,
        pending_payments: 8,
    }
}

/// Report shown when the aggregates cannot be read.
pub fn report(period: ReportPeriod, from: String) -> Report {
    let class = |class: &str, attended, absent| ClassAttendance {
        class: class.to_string(),
        attended,
        absent,
    };
    Report {
        period,
        from,
        total_students: 156,
        active_students: 150,
        total_materials: 48,
        revenue: 12_500_000,
        attendance_rate: 92.0,
        attendance_by_class: vec![class("4", 45, 5), class("5", 52, 3), class("6", 48, 3)],
        average_exam_score: 81.5,
    }
}
