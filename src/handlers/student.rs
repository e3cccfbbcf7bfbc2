// src/handlers/student.rs

//! Student portal views and actions.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::{
    attendance::{AttendanceWorkflow, ScanError, ScanOutcome, clock::date_key},
    demo,
    error::AppError,
    models::{
        attendance::{AttendanceFilter, AttendanceStatus},
        exam::{
            Exam, ExamFilter, ExamPhase, ExamResult, ExamStatus, NewExamResult, SubmitExamRequest,
            score_answers,
        },
        game::{GAMES, LeaderboardQuery, NewGameScore, SubmitScoreRequest, find_game},
        material::MaterialFilter,
        payment::{PaymentFilter, PaymentStatus},
        question::PublicQuestion,
    },
    repository::RepoError,
    session::{Session, StudentIdentity},
    state::AppState,
    views::{ViewData, or_demo},
};

fn require_student(session: &Session) -> Result<StudentIdentity, AppError> {
    session
        .student()
        .ok_or_else(|| AppError::BadRequest("Data siswa tidak ditemukan".to_string()))
}

/// Exams are only open to students of the exam's grade.
fn require_grade(session: &Session, exam: &Exam) -> Result<(), AppError> {
    match &session.kelas {
        Some(kelas) if *kelas != exam.grade => {
            Err(AppError::Forbidden("Exam is for another class".to_string()))
        }
        _ => Ok(()),
    }
}

fn status_label(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "Hadir",
        AttendanceStatus::Late => "Terlambat",
        AttendanceStatus::Absent => "Tidak Hadir",
    }
}

/// Student home: today's check-in, open exams and outstanding bills.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock().now();
    let today = date_key(&now);
    let now_utc = now.with_timezone(&Utc);

    let (today_attendance, month_attendance) = match &session.student_id {
        Some(student_id) => {
            let history = state
                .repo
                .list_attendance(&AttendanceFilter {
                    student_id: Some(student_id.clone()),
                    date: None,
                    limit: Some(31),
                })
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("Error fetching attendance: {}", e);
                    Vec::new()
                });
            let month_prefix = today.get(..7).unwrap_or(today.as_str());
            let month_count = history
                .iter()
                .filter(|r| r.date.starts_with(month_prefix))
                .count();
            (history.into_iter().find(|r| r.date == today), month_count)
        }
        None => (None, 0),
    };

    let exams = or_demo(
        state
            .repo
            .list_exams(&ExamFilter {
                grade: session.kelas.clone(),
            })
            .await,
        "exams",
        || demo::exams(now_utc),
    );
    let active_exams = ViewData {
        source: exams.source,
        items: exams
            .items
            .into_iter()
            .filter(|e| e.accepts_submissions(now_utc))
            .collect::<Vec<Exam>>(),
    };

    let pending_payments = match &session.student_id {
        Some(student_id) => state
            .repo
            .list_payments(&PaymentFilter {
                student_id: Some(student_id.clone()),
                status: Some(PaymentStatus::Pending),
            })
            .await
            .map(|p| p.len())
            .unwrap_or_else(|e| {
                tracing::error!("Error fetching payments: {}", e);
                0
            }),
        None => 0,
    };

    Ok(Json(json!({
        "view": "student/dashboard",
        "name": session.name,
        "kelas": session.kelas,
        "student_id": session.student_id,
        "today": today,
        "today_attendance": today_attendance,
        "attendance_this_month": month_attendance,
        "active_exams": active_exams,
        "pending_payments": pending_payments,
    })))
}

/// The attendance view as mounted: history, today's record, and whether the
/// scan control is offered.
pub async fn attendance_view(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let workflow =
        AttendanceWorkflow::mount(state.repo.clone(), state.devices.clone(), session.student())
            .await;

    Ok(Json(json!({
        "view": "student/attendance",
        "today": date_key(&state.clock().now()),
        "today_attendance": workflow.today(),
        "can_scan": workflow.can_scan(),
        "history": workflow.history(),
    })))
}

/// Runs the check-in scan for the signed-in student.
///
/// If the client goes away mid-scan the handler future is dropped, which
/// releases the camera and skips the write.
pub async fn scan_attendance(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    let mut workflow =
        AttendanceWorkflow::mount(state.repo.clone(), state.devices.clone(), session.student())
            .await;

    match workflow.scan().await {
        ScanOutcome::Recorded(record) => {
            let message = format!("Absensi tercatat! Status: {}", status_label(record.status));
            (
                StatusCode::CREATED,
                Json(json!({
                    "state": "success",
                    "message": message,
                    "record": record,
                    "history": workflow.history(),
                })),
            )
                .into_response()
        }
        ScanOutcome::AlreadyCheckedIn(_) => {
            AppError::Conflict("Sudah absen hari ini".to_string()).into_response()
        }
        ScanOutcome::Cancelled => {
            AppError::Conflict("Scan dibatalkan".to_string()).into_response()
        }
        ScanOutcome::Failed(e) => {
            let message = e.message().to_string();
            match e {
                ScanError::PermissionDenied
                | ScanError::CameraBusy
                | ScanError::CameraUnavailable(_)
                | ScanError::Decode(_) => AppError::DeviceError(message).into_response(),
                ScanError::MissingStudent => AppError::BadRequest(message).into_response(),
                // Logged by the workflow; the message stays readable.
                ScanError::Persistence(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response(),
            }
        }
    }
}

pub async fn materials(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(mut filter): Query<MaterialFilter>,
) -> Result<impl IntoResponse, AppError> {
    if filter.grade.is_none() {
        filter.grade = session.kelas.clone();
    }
    let materials = or_demo(
        state.repo.list_materials(&filter).await,
        "materials",
        demo::materials,
    );
    Ok(Json(materials))
}

pub async fn material_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let material = state
        .repo
        .get_material(&id)
        .await?
        .ok_or(AppError::NotFound("Material not found".to_string()))?;
    Ok(Json(material))
}

#[derive(Debug, Serialize)]
struct ExamEntry {
    #[serde(flatten)]
    exam: Exam,
    phase: ExamPhase,
    effective_status: ExamStatus,
}

/// Exams split into available, upcoming and completed.
pub async fn exams(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock().now().with_timezone(&Utc);

    let exams = or_demo(
        state
            .repo
            .list_exams(&ExamFilter {
                grade: session.kelas.clone(),
            })
            .await,
        "exams",
        || demo::exams(now),
    );

    let results_query: Result<Vec<ExamResult>, RepoError> = match &session.student_id {
        Some(student_id) => state.repo.list_student_results(student_id).await,
        None => Ok(Vec::new()),
    };
    let results = or_demo(results_query, "exam results", || demo::exam_results(now));

    let done = |exam: &Exam| results.items.iter().any(|r| r.exam_id == exam.id);
    let mut available = Vec::new();
    let mut upcoming = Vec::new();
    for exam in exams.items.iter().filter(|e| !done(e)) {
        let entry = ExamEntry {
            phase: exam.phase(now),
            effective_status: exam.effective_status(now),
            exam: exam.clone(),
        };
        match entry.phase {
            ExamPhase::Active if exam.accepts_submissions(now) => available.push(entry),
            ExamPhase::Upcoming => upcoming.push(entry),
            _ => {}
        }
    }

    Ok(Json(json!({
        "view": "student/exams",
        "source": exams.source,
        "available": available,
        "upcoming": upcoming,
        "completed": results,
    })))
}

/// An open exam with its questions, answers withheld.
pub async fn exam_detail(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam = state
        .repo
        .get_exam(&exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;
    require_grade(&session, &exam)?;

    let now = state.clock().now().with_timezone(&Utc);
    if !exam.accepts_submissions(now) {
        return Err(AppError::Forbidden("Exam is not open".to_string()));
    }

    let questions: Vec<PublicQuestion> = state
        .repo
        .questions_by_ids(&exam.question_ids)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(json!({
        "view": "student/exam",
        "exam": exam,
        "questions": questions,
    })))
}

/// Scores and stores an exam attempt. One attempt per exam.
pub async fn submit_exam(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(exam_id): Path<String>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = require_student(&session)?;

    if req.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let exam = state
        .repo
        .get_exam(&exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;
    require_grade(&session, &exam)?;

    let now = state.clock().now().with_timezone(&Utc);
    if !exam.accepts_submissions(now) {
        return Err(AppError::BadRequest("Exam is not open".to_string()));
    }

    let questions = state.repo.questions_by_ids(&exam.question_ids).await?;
    let answers: Vec<_> = req
        .answers
        .into_iter()
        .filter(|a| exam.question_ids.contains(&a.question_id))
        .collect();
    let (correct_count, score) = score_answers(&questions, &answers);

    let id = state
        .repo
        .create_exam_result(NewExamResult {
            exam_id: exam.id.clone(),
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            answers,
            score,
        })
        .await
        .map_err(|e| match e {
            RepoError::Conflict(_) => {
                AppError::Conflict("Exam already submitted".to_string())
            }
            other => {
                tracing::error!("Failed to store exam result: {}", other);
                AppError::from(other)
            }
        })?;

    tracing::info!("{} scored {} on exam {}", student.student_id, score, exam.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "score": score,
            "correct_count": correct_count,
            "total_questions": questions.len(),
            "message": "Exam submitted successfully"
        })),
    ))
}

/// Game catalog plus the leaderboard.
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
        "view": "student/games",
        "games": GAMES,
        "leaderboard": leaderboard,
    })))
}

pub async fn submit_game_score(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(game_id): Path<String>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let student = require_student(&session)?;
    let game = find_game(&game_id).ok_or(AppError::NotFound("Game not found".to_string()))?;

    let id = state
        .repo
        .create_game_score(NewGameScore {
            game_id: game.id.to_string(),
            student_id: student.student_id,
            student_name: student.name,
            score: req.score,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// The student's bills with paid and outstanding totals.
pub async fn payments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let result = match &session.student_id {
        Some(student_id) => {
            state
                .repo
                .list_payments(&PaymentFilter {
                    student_id: Some(student_id.clone()),
                    status: None,
                })
                .await
        }
        None => Ok(Vec::new()),
    };
    let payments = or_demo(result, "payments", demo::payments);

    let total = |status: PaymentStatus| -> i64 {
        payments
            .items
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.amount)
            .sum()
    };

    Ok(Json(json!({
        "view": "student/payments",
        "total_paid": total(PaymentStatus::Paid),
        "total_pending": total(PaymentStatus::Pending),
        "payments": payments,
    })))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.repo.get_student_by_user(&session.user_id).await?;

    Ok(Json(json!({
        "view": "student/profile",
        "session": session,
        "student": student,
    })))
}
