// src/session/gate.rs

//! Role-based access to views and API routes.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::{Session, SessionStore};
use crate::models::user::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/login?admin=true";
pub const ADMIN_HOME: &str = "/admin/dashboard";
pub const STUDENT_HOME: &str = "/student/dashboard";

pub fn home_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        Role::Student => STUDENT_HOME,
    }
}

/// Decides whether a session may open a view requiring `required`.
///
/// On refusal returns where to send the visitor instead: the other role's
/// home for a wrong role, the login page for no session.
pub fn gate(session: Option<&Session>, required: Role) -> Result<(), &'static str> {
    match session {
        Some(s) if s.role == required => Ok(()),
        Some(s) => Err(home_for(s.role)),
        None => Err(match required {
            Role::Admin => ADMIN_LOGIN_PATH,
            Role::Student => LOGIN_PATH,
        }),
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn view_gate(
    sessions: &SessionStore,
    required: Role,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session = sessions.load_session(bearer_token(req.headers()));

    match gate(session.as_ref(), required) {
        Ok(()) => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        Err(target) => {
            tracing::debug!("Redirecting {} to {}", req.uri().path(), target);
            Redirect::to(target).into_response()
        }
    }
}

/// Axum Middleware: student views. Redirects anyone else.
pub async fn student_view_gate(
    State(sessions): State<SessionStore>,
    req: Request<Body>,
    next: Next,
) -> Response {
    view_gate(&sessions, Role::Student, req, next).await
}

/// Axum Middleware: admin views. Redirects anyone else.
pub async fn admin_view_gate(
    State(sessions): State<SessionStore>,
    req: Request<Body>,
    next: Next,
) -> Response {
    view_gate(&sessions, Role::Admin, req, next).await
}

/// Axum Middleware: Authentication for API routes.
///
/// Validates the bearer token and injects the `Session` into the request
/// extensions. Returns 401 Unauthorized without one.
pub async fn auth_middleware(
    State(sessions): State<SessionStore>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let session = sessions
        .load_session(bearer_token(req.headers()))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

fn require_role(req: &Request<Body>, role: Role) -> Result<(), StatusCode> {
    let session = req
        .extensions()
        .get::<Session>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if session.role != role {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(())
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Returns 403 Forbidden for
/// non-admins.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_role(&req, Role::Admin)?;
    Ok(next.run(req).await)
}

/// Axum Middleware: Student Authorization. Must be used AFTER
/// `auth_middleware`.
pub async fn student_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_role(&req, Role::Student)?;
    Ok(next.run(req).await)
}
