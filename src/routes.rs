// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, student},
    session::gate::{
        LOGIN_PATH, admin_middleware, admin_view_gate, auth_middleware, student_middleware,
        student_view_gate,
    },
    state::AppState,
};

/// Assembles the main application router.
///
/// * Public: login view and the auth API.
/// * `/student/*` and `/admin/*` views are gated and redirect on refusal.
/// * `/api/student/*` and `/api/admin/*` answer 401/403 instead.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session));

    let student_views = Router::new()
        .route("/dashboard", get(student::dashboard))
        .route("/attendance", get(student::attendance_view))
        .route("/materials", get(student::materials))
        .route("/materials/{id}", get(student::material_detail))
        .route("/exams", get(student::exams))
        .route("/exams/{id}", get(student::exam_detail))
        .route("/games", get(student::games))
        .route("/payments", get(student::payments))
        .route("/profile", get(student::profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            student_view_gate,
        ));

    let admin_views = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/students", get(admin::students))
        .route("/attendance", get(admin::attendance))
        .route("/materials", get(admin::materials))
        .route("/questions", get(admin::questions))
        .route("/questions/{id}", get(admin::question_detail))
        .route("/exams", get(admin::exams))
        .route("/exams/{id}/results", get(admin::exam_results))
        .route("/games", get(admin::games))
        .route("/payments", get(admin::payments))
        .route("/reports", get(admin::reports))
        .layer(middleware::from_fn_with_state(state.clone(), admin_view_gate));

    let student_api = Router::new()
        .route("/attendance/scan", post(student::scan_attendance))
        .route("/exams/{id}/submit", post(student::submit_exam))
        .route("/games/{game_id}/scores", post(student::submit_game_score))
        // Auth first, then the role check
        .layer(middleware::from_fn(student_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_api = Router::new()
        .route("/students", post(admin::create_student))
        .route("/students/{id}", put(admin::update_student))
        .route("/attendance", post(admin::record_attendance))
        .route("/materials", post(admin::create_material))
        .route("/questions", post(admin::create_question))
        .route("/exams", post(admin::create_exam))
        .route("/payments", post(admin::create_payment))
        .route("/payments/{id}/status", put(admin::update_payment_status))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(|| async { Redirect::to(LOGIN_PATH) }))
        .route("/login", get(auth::login_page))
        .nest("/api/auth", auth_routes)
        .nest("/student", student_views)
        .nest("/admin", admin_views)
        .nest("/api/student", student_api)
        .nest("/api/admin", admin_api)
        // Global Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
