// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        student::{DEFAULT_CLASS, NewStudent, Student, StudentStatus},
        user::{LoginRequest, NewUser, RegisterRequest, Role, User},
    },
    repository::{RepoError, Repository},
    session::{
        Session, SessionStore,
        gate::{bearer_token, home_for},
    },
    utils::{
        codes,
        hash::{hash_password, verify_password},
    },
};

const CODE_ATTEMPTS: i64 = 5;

/// Creates a login account and its student profile.
///
/// The student code and barcode are generated; a taken code is retried a
/// few times with the next value before giving up.
pub(crate) async fn enroll_student(
    repo: &Repository,
    req: &RegisterRequest,
    birth_date: Option<NaiveDate>,
) -> Result<(User, Student), AppError> {
    if repo.find_user_by_login(&req.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' already exists",
            req.username
        )));
    }
    if let Some(email) = &req.email {
        if repo.find_user_by_login(email).await?.is_some() {
            return Err(AppError::Conflict(format!("Email '{}' already exists", email)));
        }
    }

    let hashed_password = hash_password(&req.password)?;
    let user_id = repo
        .create_user(NewUser {
            username: req.username.clone(),
            email: req.email.clone(),
            name: req.name.clone(),
            password: hashed_password,
            role: Role::Student,
        })
        .await
        .map_err(|e| match e {
            RepoError::Conflict(_) => {
                AppError::Conflict(format!("Username '{}' already exists", req.username))
            }
            other => {
                tracing::error!("Failed to register user: {}", other);
                AppError::from(other)
            }
        })?;

    let millis = Utc::now().timestamp_millis();
    let mut student_pk = None;
    for attempt in 0..CODE_ATTEMPTS {
        let student_code = codes::student_code(millis + attempt);
        if repo.get_student_by_code(&student_code).await?.is_some() {
            continue;
        }

        let created = repo
            .create_student(NewStudent {
                user_id: user_id.clone(),
                name: req.name.clone(),
                student_id: student_code,
                barcode: codes::barcode(millis + attempt),
                class: req.class.clone().unwrap_or_else(|| DEFAULT_CLASS.to_string()),
                parent_name: req.parent_name.clone().unwrap_or_default(),
                parent_phone: req.parent_phone.clone().unwrap_or_default(),
                birth_date,
                status: StudentStatus::Active,
            })
            .await;

        match created {
            Ok(id) => {
                student_pk = Some(id);
                break;
            }
            Err(RepoError::Conflict(msg)) => {
                tracing::warn!("Student code collision, retrying: {}", msg);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let student_pk = student_pk.ok_or_else(|| {
        AppError::InternalServerError("Could not allocate a student code".to_string())
    })?;

    let user = repo
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Registered user vanished".to_string()))?;
    let student = repo
        .get_student(&student_pk)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Registered student vanished".to_string()))?;

    tracing::info!("Registered student {} ({})", student.student_id, user.username);
    Ok((user, student))
}

fn session_response(
    sessions: &SessionStore,
    session: Session,
) -> Result<serde_json::Value, AppError> {
    let token = sessions.save_session(&session)?;
    Ok(json!({
        "token": token,
        "type": "Bearer",
        "redirect": home_for(session.role),
        "session": session,
    }))
}

/// Registers a student and signs them in.
///
/// Returns 201 Created with a session token.
pub async fn register(
    State(repo): State<Repository>,
    State(sessions): State<SessionStore>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, student) = enroll_student(&repo, &payload, None).await?;
    let session = Session::for_user(&user, Some(&student), Utc::now().timestamp_millis());

    Ok((StatusCode::CREATED, Json(session_response(&sessions, session)?)))
}

/// Authenticates by username or email and returns a session token.
pub async fn login(
    State(repo): State<Repository>,
    State(sessions): State<SessionStore>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = repo
        .find_user_by_login(payload.username.trim())
        .await?
        .ok_or(AppError::AuthError("Username atau password salah".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Username atau password salah".to_string()));
    }

    let student = match user.role {
        Role::Student => repo.get_student_by_user(&user.id).await?,
        Role::Admin => None,
    };
    if user.role == Role::Student && student.is_none() {
        tracing::warn!("Student {} has no profile", user.username);
    }

    let session = Session::for_user(&user, student.as_ref(), Utc::now().timestamp_millis());
    tracing::info!("{} signed in as {}", user.username, user.role);

    Ok(Json(session_response(&sessions, session)?))
}

/// Clears the caller's session.
pub async fn logout(State(sessions): State<SessionStore>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        sessions.clear_session(token);
    }
    StatusCode::NO_CONTENT
}

/// Returns the caller's session, or 401 if there is none.
pub async fn current_session(
    State(sessions): State<SessionStore>,
    headers: HeaderMap,
) -> Result<Json<Session>, AppError> {
    sessions
        .load_session(bearer_token(&headers))
        .map(Json)
        .ok_or_else(|| AppError::AuthError("Not signed in".to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    #[serde(default)]
    pub admin: bool,
}

/// The login view. Signed-in visitors are sent to their home.
pub async fn login_page(
    State(sessions): State<SessionStore>,
    headers: HeaderMap,
    Query(query): Query<LoginPageQuery>,
) -> Response {
    if let Some(session) = sessions.load_session(bearer_token(&headers)) {
        return Redirect::to(home_for(session.role)).into_response();
    }

    Json(json!({
        "view": "login",
        "admin": query.admin,
        "modes": ["login", "register"],
    }))
    .into_response()
}
