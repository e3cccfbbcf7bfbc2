// tests/api_tests.rs

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{TODAY, jakarta, login, spawn_app, spawn_app_at, spawn_app_with};
use narang::attendance::decoder::SimulatedDecoder;
use reqwest::header::LOCATION;
use serde_json::{Value, json};

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_creates_student_and_session() {
    let app = spawn_app().await;
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "name": "Budi Santoso",
            "username": unique_name,
            "password": "password123",
            "email": format!("{}@example.com", unique_name),
            "class": "5",
            "parent_phone": "08123456790"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect"], "/student/dashboard");
    let session = &body["session"];
    assert_eq!(session["role"], "student");
    assert_eq!(session["kelas"], "5");
    assert!(session["student_id"].as_str().unwrap().starts_with("SD"));
    assert!(session["barcode"].as_str().unwrap().starts_with("NRG"));

    // The new account can sign in.
    let token = login(&app, &unique_name, "password123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;

    // Username too short
    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "name": "Yo",
            "username": "yo",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Unknown class
    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "name": "Citra",
            "username": "citra_d",
            "password": "password123",
            "class": "9"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_rejects_taken_username() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "name": "Imposter",
            "username": "siswa",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "siswa", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username atau password salah");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = spawn_app().await;
    let token = login(&app, "siswa", "siswa123").await;

    let session = app
        .client
        .get(app.url("/api/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(session.status().as_u16(), 200);

    let logout = app
        .client
        .post(app.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 204);

    let session = app
        .client
        .get(app.url("/api/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(session.status().as_u16(), 401);
}

async fn redirect_target(app: &common::TestApp, path: &str, token: Option<&str>) -> String {
    let mut request = app.client.get(app.url(path));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await.unwrap();
    assert_eq!(response.status().as_u16(), 303, "{} did not redirect", path);
    response.headers()[LOCATION].to_str().unwrap().to_string()
}

#[tokio::test]
async fn views_redirect_by_role() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let student = login(&app, "siswa", "siswa123").await;

    assert_eq!(
        redirect_target(&app, "/student/dashboard", Some(&admin)).await,
        "/admin/dashboard"
    );
    assert_eq!(
        redirect_target(&app, "/admin/dashboard", Some(&student)).await,
        "/student/dashboard"
    );
    assert_eq!(
        redirect_target(&app, "/student/attendance", None).await,
        "/login"
    );
    assert_eq!(
        redirect_target(&app, "/admin/reports", None).await,
        "/login?admin=true"
    );
    assert_eq!(
        redirect_target(&app, "/login", Some(&student)).await,
        "/student/dashboard"
    );
}

#[tokio::test]
async fn api_routes_refuse_instead_of_redirecting() {
    let app = spawn_app().await;
    let student = login(&app, "siswa", "siswa123").await;

    let anonymous = app
        .client
        .post(app.url("/api/student/attendance/scan"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let wrong_role = app
        .client
        .post(app.url("/api/admin/payments"))
        .bearer_auth(&student)
        .json(&json!({ "student_id": "SD2024001", "month": 3, "year": 2025, "amount": 250000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_role.status().as_u16(), 403);
}

#[tokio::test]
async fn demo_student_checks_in_before_eight() {
    let app = spawn_app_at(jakarta(7, 45), true).await;

    // Signing in by email resolves the demo student profile.
    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "siswa@narang.id", "password": "siswa123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["session"]["role"], "student");
    assert_eq!(body["session"]["student_id"], "SD2024001");
    assert_eq!(body["session"]["barcode"], "NRGDEMO123");
    let token = body["token"].as_str().unwrap().to_string();

    let view: Value = app
        .client
        .get(app.url("/student/attendance"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["can_scan"], true);
    assert_eq!(view["history"].as_array().unwrap().len(), 0);

    let scan = app
        .client
        .post(app.url("/api/student/attendance/scan"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(scan.status().as_u16(), 201);
    let scan: Value = scan.json().await.unwrap();
    assert_eq!(scan["record"]["status"], "present");
    assert_eq!(scan["record"]["date"], TODAY);
    assert_eq!(scan["record"]["time"], "07:45");
    assert_eq!(app.camera.live_tracks(), 0);

    let view: Value = app
        .client
        .get(app.url("/student/attendance"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["can_scan"], false);
    assert_eq!(view["today_attendance"]["status"], "present");
    let history = view["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["student_id"], "SD2024001");

    let again = app
        .client
        .post(app.url("/api/student/attendance/scan"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 409);
}

#[tokio::test]
async fn students_can_check_in_at_the_same_time() {
    let app = spawn_app_with(
        jakarta(7, 45),
        true,
        Arc::new(SimulatedDecoder::new(Duration::from_millis(300))),
    )
    .await;
    let siswa = login(&app, "siswa", "siswa123").await;

    let registered: Value = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "name": "Budi Santoso",
            "username": "budi1",
            "password": "password123",
            "class": "4",
            "parent_phone": "08123456790"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let budi = registered["token"].as_str().unwrap().to_string();

    let scan = |token: String| {
        let request = app
            .client
            .post(app.url("/api/student/attendance/scan"))
            .bearer_auth(token);
        async move { request.send().await.unwrap().status().as_u16() }
    };
    let statuses = tokio::join!(scan(siswa), scan(budi));

    assert_eq!(statuses, (201, 201));
    assert_eq!(app.camera.live_tracks(), 0);
}

#[tokio::test]
async fn denied_camera_reports_a_readable_error() {
    let app = spawn_app().await;
    let token = login(&app, "siswa", "siswa123").await;
    app.camera.set_permission(false);

    let response = app
        .client
        .post(app.url("/api/student/attendance/scan"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Tidak dapat mengakses kamera. Pastikan izin kamera diberikan."
    );
}

#[tokio::test]
async fn empty_lists_fall_back_to_demo_data() {
    let app = spawn_app().await;
    let token = login(&app, "siswa", "siswa123").await;

    let materials: Value = app
        .client
        .get(app.url("/student/materials"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(materials["source"], "demo");
    assert!(!materials["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn storage_failure_falls_back_to_demo_data() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    app.repo.pool().close().await;

    let students = app
        .client
        .get(app.url("/admin/students"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(students.status().as_u16(), 200);
    let students: Value = students.json().await.unwrap();
    assert_eq!(students["source"], "demo");
    assert_eq!(students["items"][0]["student_id"], "SD2024001");

    let dashboard: Value = app
        .client
        .get(app.url("/admin/dashboard"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["source"], "demo");
    assert_eq!(dashboard["stats"]["total_students"], 124);
}

#[tokio::test]
async fn student_lists_fall_back_when_empty() {
    let app = spawn_app().await;
    let token = login(&app, "siswa", "siswa123").await;

    for (path, source) in [
        ("/student/exams", "/source"),
        ("/student/games", "/leaderboard/source"),
        ("/student/payments", "/payments/source"),
    ] {
        let body: Value = app
            .client
            .get(app.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.pointer(source), Some(&json!("demo")), "{}", path);
    }
}

#[tokio::test]
async fn student_views_fall_back_when_storage_fails() {
    let app = spawn_app().await;
    let token = login(&app, "siswa", "siswa123").await;

    app.repo.pool().close().await;

    let get = |path: &str| {
        let request = app.client.get(app.url(path)).bearer_auth(&token);
        async move {
            let response = request.send().await.unwrap();
            assert_eq!(response.status().as_u16(), 200);
            response.json::<Value>().await.unwrap()
        }
    };

    let exams = get("/student/exams").await;
    assert_eq!(exams["source"], "demo");
    assert!(!exams["available"].as_array().unwrap().is_empty());
    assert_eq!(exams["completed"]["source"], "demo");

    let games = get("/student/games").await;
    assert_eq!(games["leaderboard"]["source"], "demo");
    assert_eq!(games["leaderboard"]["items"][0]["student_name"], "Anisa Putri");

    let payments = get("/student/payments").await;
    assert_eq!(payments["payments"]["source"], "demo");
    assert_eq!(payments["total_paid"], 800000);
    assert_eq!(payments["total_pending"], 400000);
}

#[tokio::test]
async fn reports_fall_back_when_storage_fails() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    app.repo.pool().close().await;

    let response = app
        .client
        .get(app.url("/admin/reports?period=week"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["source"], "demo");
    assert_eq!(body["report"]["period"], "week");
    assert_eq!(body["report"]["from"], "2025-02-24");
    assert_eq!(body["report"]["attendance_by_class"][0]["class"], "4");
}

#[tokio::test]
async fn live_data_replaces_demo_data() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let created = app
        .client
        .post(app.url("/api/admin/materials"))
        .bearer_auth(&admin)
        .json(&json!({
            "title": "Pecahan Sederhana",
            "description": "Mengenal pecahan",
            "content": "<p>Setengah</p><script>alert(1)</script>",
            "images": ["https://cdn.narang.id/pecahan.png"],
            "category": "matematika",
            "grade": "4",
            "author": "Bu Sari"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let material: Value = created.json().await.unwrap();
    assert_eq!(material["content"], "<p>Setengah</p>");

    let listed: Value = app
        .client
        .get(app.url("/admin/materials"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["source"], "live");
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
    assert_eq!(listed["items"][0]["title"], "Pecahan Sederhana");
}

async fn create_question(app: &common::TestApp, admin: &str, body: Value) -> String {
    let response = app
        .client
        .post(app.url("/api/admin/questions"))
        .bearer_auth(admin)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn exam_submission_is_scored_once() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let student = login(&app, "siswa", "siswa123").await;

    let q1 = create_question(
        &app,
        &admin,
        json!({
            "question": "5 + 7 = ?",
            "options": ["10", "11", "12", "13"],
            "correct_answer": "12",
            "type": "multiple_choice",
            "category": "matematika",
            "grade": "4",
            "difficulty": "easy",
            "points": 10
        }),
    )
    .await;
    let q2 = create_question(
        &app,
        &admin,
        json!({
            "question": "Ibu kota Indonesia adalah ...",
            "correct_answer": "Jakarta",
            "type": "fill_blank",
            "category": "ips",
            "grade": "4",
            "difficulty": "easy",
            "points": 10
        }),
    )
    .await;

    let exam = app
        .client
        .post(app.url("/api/admin/exams"))
        .bearer_auth(&admin)
        .json(&json!({
            "title": "Ujian Campuran",
            "description": "",
            "question_ids": [q1, q2],
            "duration": 30,
            "start_time": "2025-03-02T00:00:00Z",
            "end_time": "2025-03-10T00:00:00Z",
            "grade": "4",
            "status": "published"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(exam.status().as_u16(), 201);
    let exam: Value = exam.json().await.unwrap();
    let exam_id = exam["id"].as_str().unwrap().to_string();

    // Answers are withheld from the exam sheet.
    let sheet: Value = app
        .client
        .get(app.url(&format!("/student/exams/{}", exam_id)))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sheet["questions"].as_array().unwrap().len(), 2);
    assert!(sheet["questions"][0].get("correct_answer").is_none());

    let submit = |answers: Value| {
        app.client
            .post(app.url(&format!("/api/student/exams/{}/submit", exam_id)))
            .bearer_auth(&student)
            .json(&json!({ "answers": answers }))
            .send()
    };

    let first = submit(json!([
        { "question_id": q1, "answer": "12" },
        { "question_id": q2, "answer": " jakarta " }
    ]))
    .await
    .unwrap();
    assert_eq!(first.status().as_u16(), 201);
    let first: Value = first.json().await.unwrap();
    assert_eq!(first["score"], 100);
    assert_eq!(first["correct_count"], 2);

    let second = submit(json!([{ "question_id": q1, "answer": "10" }]))
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);

    let results: Value = app
        .client
        .get(app.url(&format!("/admin/exams/{}/results", exam_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["results"].as_array().unwrap().len(), 1);
    assert_eq!(results["results"][0]["student_id"], "SD2024001");
}

#[tokio::test]
async fn exam_with_unknown_question_is_rejected() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let response = app
        .client
        .post(app.url("/api/admin/exams"))
        .bearer_auth(&admin)
        .json(&json!({
            "title": "Ujian Kosong",
            "description": "",
            "question_ids": ["does-not-exist"],
            "duration": 30,
            "start_time": "2025-03-02T00:00:00Z",
            "end_time": "2025-03-10T00:00:00Z",
            "grade": "4"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn exam_for_another_class_is_forbidden() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let student = login(&app, "siswa", "siswa123").await;

    let q1 = create_question(
        &app,
        &admin,
        json!({
            "question": "12 x 12 = ?",
            "correct_answer": "144",
            "type": "fill_blank",
            "category": "matematika",
            "grade": "6",
            "difficulty": "medium",
            "points": 10
        }),
    )
    .await;
    let exam: Value = app
        .client
        .post(app.url("/api/admin/exams"))
        .bearer_auth(&admin)
        .json(&json!({
            "title": "Ujian Kelas 6",
            "description": "",
            "question_ids": [q1],
            "duration": 30,
            "start_time": "2025-03-02T00:00:00Z",
            "end_time": "2025-03-10T00:00:00Z",
            "grade": "6",
            "status": "published"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let exam_id = exam["id"].as_str().unwrap();

    let sheet = app
        .client
        .get(app.url(&format!("/student/exams/{}", exam_id)))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap();
    assert_eq!(sheet.status().as_u16(), 403);

    let submit = app
        .client
        .post(app.url(&format!("/api/student/exams/{}/submit", exam_id)))
        .bearer_auth(&student)
        .json(&json!({ "answers": [{ "question_id": q1, "answer": "144" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status().as_u16(), 403);
    assert!(app.repo.list_exam_results(Some(exam_id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn payment_can_be_marked_paid() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let student = login(&app, "siswa", "siswa123").await;

    let created = app
        .client
        .post(app.url("/api/admin/payments"))
        .bearer_auth(&admin)
        .json(&json!({ "student_id": "SD2024001", "month": 3, "year": 2025, "amount": 250000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let payment: Value = created.json().await.unwrap();
    assert_eq!(payment["status"], "pending");
    assert_eq!(payment["student_name"], "Siswa Demo");
    assert!(payment["paid_at"].is_null());
    let id = payment["id"].as_str().unwrap().to_string();

    let paid = app
        .client
        .put(app.url(&format!("/api/admin/payments/{}/status", id)))
        .bearer_auth(&admin)
        .json(&json!({ "status": "paid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(paid.status().as_u16(), 200);
    let paid: Value = paid.json().await.unwrap();
    assert_eq!(paid["status"], "paid");
    assert!(paid["paid_at"].is_string());

    let view: Value = app
        .client
        .get(app.url("/student/payments"))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["payments"]["source"], "live");
    assert_eq!(view["total_paid"], 250000);
    assert_eq!(view["total_pending"], 0);

    let report: Value = app
        .client
        .get(app.url("/admin/reports?period=week"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["source"], "live");
    assert_eq!(report["report"]["period"], "week");
    assert_eq!(report["report"]["total_students"], 1);
    assert_eq!(report["report"]["revenue"], 250000);
}

#[tokio::test]
async fn payment_for_unknown_student_is_404() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let response = app
        .client
        .post(app.url("/api/admin/payments"))
        .bearer_auth(&admin)
        .json(&json!({ "student_id": "SD9999999", "month": 3, "year": 2025, "amount": 250000 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn admin_marks_absence_by_barcode() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let created = app
        .client
        .post(app.url("/api/admin/attendance"))
        .bearer_auth(&admin)
        .json(&json!({ "code": "NRGDEMO123", "status": "absent", "notes": "Sakit" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    let day: Value = app
        .client
        .get(app.url(&format!("/admin/attendance?date={}", TODAY)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(day["records"]["source"], "live");
    assert_eq!(day["counts"]["absent"], 1);
    assert_eq!(day["records"]["items"][0]["notes"], "Sakit");
}

#[tokio::test]
async fn admin_enrolls_and_edits_a_student() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "admin123").await;

    let created = app
        .client
        .post(app.url("/api/admin/students"))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "Eka Putri",
            "username": "eka_putri",
            "password": "rahasia99",
            "class": "5",
            "parent_name": "Ibu Rina",
            "parent_phone": "08123456793",
            "birth_date": "2015-06-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let student: Value = created.json().await.unwrap();
    assert_eq!(student["birth_date"], "2015-06-01");
    let id = student["id"].as_str().unwrap().to_string();

    let updated = app
        .client
        .put(app.url(&format!("/api/admin/students/{}", id)))
        .bearer_auth(&admin)
        .json(&json!({ "class": "6", "status": "inactive" }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status().as_u16(), 200);
    let updated: Value = updated.json().await.unwrap();
    assert_eq!(updated["class"], "6");
    assert_eq!(updated["status"], "inactive");
    assert_eq!(updated["name"], "Eka Putri");
}

#[tokio::test]
async fn game_scores_feed_the_leaderboard() {
    let app = spawn_app().await;
    let student = login(&app, "siswa", "siswa123").await;

    let unknown = app
        .client
        .post(app.url("/api/student/games/chess/scores"))
        .bearer_auth(&student)
        .json(&json!({ "score": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    let saved = app
        .client
        .post(app.url("/api/student/games/math-challenge/scores"))
        .bearer_auth(&student)
        .json(&json!({ "score": 480 }))
        .send()
        .await
        .unwrap();
    assert_eq!(saved.status().as_u16(), 201);

    let games: Value = app
        .client
        .get(app.url("/student/games?game_id=math-challenge"))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(games["games"].as_array().unwrap().len(), 4);
    assert_eq!(games["leaderboard"]["source"], "live");
    assert_eq!(games["leaderboard"]["items"][0]["score"], 480);
}
