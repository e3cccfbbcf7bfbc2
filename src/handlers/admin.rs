// src/handlers/admin.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    attendance::clock::{date_key, time_key},
    demo,
    error::AppError,
    handlers::auth::enroll_student,
    models::{
        attendance::{AttendanceFilter, AttendanceStatus, ManualAttendanceRequest, NewAttendance},
        exam::{CreateExamRequest, Exam, ExamFilter, ExamStatus},
        game::{GAMES, LeaderboardQuery},
        material::{CreateMaterialRequest, MaterialFilter},
        payment::{
            CreatePaymentRequest, NewPayment, Payment, PaymentFilter, PaymentStatus,
            UpdatePaymentStatusRequest,
        },
        question::{CreateQuestionRequest, QuestionFilter},
        report::{Report, ReportPeriod, ReportQuery, summarize_attendance},
        student::{AdminCreateStudentRequest, StudentStatus, UpdateStudentRequest},
    },
    repository::{RepoResult, Repository},
    state::AppState,
    utils::{codes, html::clean_html},
    views::{or_demo, value_or_demo},
};

/// Admin home: headline counters plus today's check-ins.
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let today = date_key(&state.clock().now());

    let (source, stats) = value_or_demo(
        state.repo.dashboard_stats(&today).await,
        "dashboard stats",
        demo::dashboard_stats,
    );
    let recent = or_demo(
        state
            .repo
            .list_attendance(&AttendanceFilter {
                student_id: None,
                date: Some(today.clone()),
                limit: Some(10),
            })
            .await,
        "attendance",
        || demo::attendance(&today),
    );

    Ok(Json(json!({
        "view": "admin/dashboard",
        "today": today,
        "source": source,
        "stats": stats,
        "recent_attendance": recent,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    pub class: Option<String>,
}

pub async fn students(
    State(repo): State<Repository>,
    Query(query): Query<StudentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let students = or_demo(
        repo.list_students(query.class.as_deref()).await,
        "students",
        demo::students,
    );
    Ok(Json(students))
}

/// Enrolls a student with a login account.
pub async fn create_student(
    State(repo): State<Repository>,
    Json(payload): Json<AdminCreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (_, student) = enroll_student(&repo, &payload.account, payload.birth_date).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(repo): State<Repository>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = repo
        .update_student(&id, &payload)
        .await?
        .ok_or(AppError::NotFound("Student not found".to_string()))?;

    tracing::info!("Updated student {}", student.student_id);
    Ok(Json(student))
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceDayQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Serialize)]
struct DayCounts {
    present: usize,
    late: usize,
    absent: usize,
}

/// Check-ins for one day, today by default.
pub async fn attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceDayQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = match query.date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => date_key(&state.clock().now()),
    };

    let records = or_demo(
        state
            .repo
            .list_attendance(&AttendanceFilter {
                student_id: None,
                date: Some(date.clone()),
                limit: Some(500),
            })
            .await,
        "attendance",
        || demo::attendance(&date),
    );

    let mut counts = DayCounts::default();
    for record in &records.items {
        match record.status {
            AttendanceStatus::Present => counts.present += 1,
            AttendanceStatus::Late => counts.late += 1,
            AttendanceStatus::Absent => counts.absent += 1,
        }
    }

    Ok(Json(json!({
        "view": "admin/attendance",
        "date": date,
        "counts": counts,
        "records": records,
    })))
}

/// Records attendance by hand for a student found by code or barcode.
pub async fn record_attendance(
    State(state): State<AppState>,
    Json(payload): Json<ManualAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let code = payload.code.trim();
    let found = if codes::is_barcode(code) {
        state.repo.get_student_by_barcode(code).await?
    } else if codes::is_student_code(code) {
        state.repo.get_student_by_code(code).await?
    } else {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a student code or barcode",
            code
        )));
    };
    let student = found.ok_or(AppError::NotFound("Student not found".to_string()))?;

    let now = state.clock().now();
    let date = match payload.date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => date_key(&now),
    };

    let id = state
        .repo
        .create_attendance(NewAttendance {
            student_id: student.student_id,
            student_name: student.name,
            date,
            time: time_key(&now),
            status: payload.status,
            notes: payload.notes,
        })
        .await?;
    let record = state
        .repo
        .get_attendance(&id)
        .await?
        .ok_or(AppError::InternalServerError("Attendance vanished".to_string()))?;

    tracing::info!(
        "Manual attendance for {} on {}: {}",
        record.student_id,
        record.date,
        record.status
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn materials(
    State(repo): State<Repository>,
    Query(filter): Query<MaterialFilter>,
) -> Result<impl IntoResponse, AppError> {
    let materials = or_demo(
        repo.list_materials(&filter).await,
        "materials",
        demo::materials,
    );
    Ok(Json(materials))
}

/// Publishes a material. The HTML body is sanitized before storage.
pub async fn create_material(
    State(repo): State<Repository>,
    Json(mut payload): Json<CreateMaterialRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.content = clean_html(&payload.content);

    let id = repo.create_material(&payload).await?;
    let material = repo
        .get_material(&id)
        .await?
        .ok_or(AppError::InternalServerError("Material vanished".to_string()))?;

    tracing::info!("Material created: {}", material.title);
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn questions(
    State(repo): State<Repository>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let questions = or_demo(
        repo.list_questions(&filter).await,
        "questions",
        demo::questions,
    );
    Ok(Json(questions))
}

pub async fn question_detail(
    State(repo): State<Repository>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let question = repo
        .get_question(&id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;
    Ok(Json(question))
}

pub async fn create_question(
    State(repo): State<Repository>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = repo.create_question(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Question created successfully" })),
    ))
}

#[derive(Debug, Serialize)]
struct AdminExam {
    #[serde(flatten)]
    exam: Exam,
    effective_status: ExamStatus,
}

pub async fn exams(
    State(state): State<AppState>,
    Query(filter): Query<ExamFilter>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock().now().with_timezone(&Utc);
    let exams = or_demo(
        state.repo.list_exams(&filter).await,
        "exams",
        || demo::exams(now),
    );

    let items: Vec<AdminExam> = exams
        .items
        .into_iter()
        .map(|exam| AdminExam {
            effective_status: exam.effective_status(now),
            exam,
        })
        .collect();

    Ok(Json(json!({
        "view": "admin/exams",
        "source": exams.source,
        "items": items,
    })))
}

/// Submissions for one exam, best score first.
pub async fn exam_results(
    State(repo): State<Repository>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam = repo
        .get_exam(&id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;
    let results = repo.list_exam_results(Some(&exam.id)).await?;

    Ok(Json(json!({
        "view": "admin/exam_results",
        "exam": exam,
        "results": results,
    })))
}

/// Creates an exam. Every referenced question must exist.
pub async fn create_exam(
    State(repo): State<Repository>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let found = repo.questions_by_ids(&payload.question_ids).await?;
    if let Some(missing) = payload
        .question_ids
        .iter()
        .find(|id| !found.iter().any(|q| &q.id == *id))
    {
        return Err(AppError::BadRequest(format!("Unknown question '{}'", missing)));
    }

    let id = repo.create_exam(&payload).await?;
    let exam = repo
        .get_exam(&id)
        .await?
        .ok_or(AppError::InternalServerError("Exam vanished".to_string()))?;

    tracing::info!("Exam created: {} ({})", exam.title, exam.status);
    Ok((StatusCode::CREATED, Json(exam)))
}

/// Game catalog and the cross-game leaderboard.
pub async fn games(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock().now().with_timezone(&Utc);
    let leaderboard = or_demo(
        state.repo.leaderboard(&query).await,
        "leaderboard",
        || demo::leaderboard(now),
    );

    Ok(Json(json!({
        "view": "admin/games",
        "games": GAMES,
        "leaderboard": leaderboard,
    })))
}

pub async fn payments(
    State(repo): State<Repository>,
    Query(filter): Query<PaymentFilter>,
) -> Result<impl IntoResponse, AppError> {
    let payments = or_demo(repo.list_payments(&filter).await, "payments", demo::payments);

    let sum = |status: PaymentStatus| -> i64 {
        payments
            .items
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.amount)
            .sum()
    };

    Ok(Json(json!({
        "view": "admin/payments",
        "total_paid": sum(PaymentStatus::Paid),
        "total_pending": sum(PaymentStatus::Pending),
        "payments": payments,
    })))
}

/// Bills a student, identified by student code, for one month.
pub async fn create_payment(
    State(repo): State<Repository>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = repo
        .get_student_by_code(&payload.student_id)
        .await?
        .ok_or(AppError::NotFound("Student not found".to_string()))?;

    let id = repo
        .create_payment(NewPayment {
            student_id: student.student_id,
            student_name: student.name,
            month: payload.month,
            year: payload.year,
            amount: payload.amount,
            notes: payload.notes,
        })
        .await?;
    let payment: Payment = repo
        .get_payment(&id)
        .await?
        .ok_or(AppError::InternalServerError("Payment vanished".to_string()))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update_payment_status(
    State(repo): State<Repository>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment = repo
        .set_payment_status(&id, payload.status, Utc::now())
        .await?
        .ok_or(AppError::NotFound("Payment not found".to_string()))?;

    tracing::info!(
        "Payment {} for {} {} {} is now {}",
        payment.id,
        payment.student_id,
        payment.month_name(),
        payment.year,
        payment.status
    );
    Ok(Json(payment))
}

async fn build_report(
    repo: &Repository,
    period: ReportPeriod,
    now: DateTime<FixedOffset>,
) -> RepoResult<Report> {
    let today = now.date_naive();
    let since = period.since(now);
    let from_key = period.start(today).format("%Y-%m-%d").to_string();
    let today_key = today.format("%Y-%m-%d").to_string();

    let records = repo.list_attendance_between(&from_key, &today_key).await?;
    let class_of: HashMap<String, String> = repo
        .list_students(None)
        .await?
        .into_iter()
        .map(|s| (s.student_id, s.class))
        .collect();
    let (attendance_rate, attendance_by_class) = summarize_attendance(&records, &class_of);

    Ok(Report {
        period,
        from: from_key,
        total_students: repo.count_students(None).await?,
        active_students: repo.count_students(Some(StudentStatus::Active)).await?,
        total_materials: repo.count_materials().await?,
        revenue: repo.paid_revenue_since(since).await?,
        attendance_rate,
        attendance_by_class,
        average_exam_score: repo.average_exam_score_since(since).await?,
    })
}

/// Aggregates over the last week, month or year.
pub async fn reports(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock().now();
    let period = query.period;
    let from_key = period.start(now.date_naive()).format("%Y-%m-%d").to_string();

    let (source, report) = value_or_demo(
        build_report(&state.repo, period, now).await,
        "report",
        || demo::report(period, from_key),
    );

    Ok(Json(json!({
        "view": "admin/reports",
        "source": source,
        "report": report,
    })))
}
