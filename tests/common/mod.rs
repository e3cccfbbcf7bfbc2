// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use narang::{
    attendance::{
        ScanDevices,
        camera::VirtualCamera,
        clock::FixedClock,
        decoder::{BarcodeDecoder, SimulatedDecoder},
    },
    config::Config,
    repository::Repository,
    routes,
    seed::seed_demo_accounts,
    state::AppState,
};
use sqlx::sqlite::SqlitePoolOptions;

pub struct TestApp {
    pub address: String,
    pub repo: Repository,
    pub camera: Arc<VirtualCamera>,
    /// Does not follow redirects, so gate responses can be inspected.
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// 3 March 2025 (a Monday) at `hour:minute` in Jakarta time.
pub fn jakarta(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 3, hour, minute, 0)
        .unwrap()
}

pub const TODAY: &str = "2025-03-03";

/// A fresh in-memory database. One connection, kept open for the whole
/// test, since every SQLite memory connection is its own database.
pub async fn memory_repo() -> Repository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    let repo = Repository::new(pool);
    repo.migrate().await.expect("Failed to migrate database");
    repo
}

pub fn devices(
    camera: Arc<VirtualCamera>,
    decoder: Arc<dyn BarcodeDecoder>,
    now: DateTime<FixedOffset>,
) -> ScanDevices {
    ScanDevices {
        camera,
        decoder,
        clock: Arc::new(FixedClock(now)),
    }
}

pub fn fast_decoder() -> Arc<dyn BarcodeDecoder> {
    Arc::new(SimulatedDecoder::new(Duration::from_millis(10)))
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        scan_delay_ms: 10,
        ..Config::default()
    }
}

/// Spawns the app with the demo accounts seeded and the clock at 07:30.
pub async fn spawn_app() -> TestApp {
    spawn_app_at(jakarta(7, 30), true).await
}

/// Helper function to spawn the app on a random port for testing.
pub async fn spawn_app_at(now: DateTime<FixedOffset>, seed: bool) -> TestApp {
    spawn_app_with(now, seed, fast_decoder()).await
}

pub async fn spawn_app_with(
    now: DateTime<FixedOffset>,
    seed: bool,
    decoder: Arc<dyn BarcodeDecoder>,
) -> TestApp {
    let repo = memory_repo().await;
    if seed {
        seed_demo_accounts(&repo)
            .await
            .expect("Failed to seed demo accounts");
    }

    let camera = Arc::new(VirtualCamera::new(true));
    let state = AppState::with_devices(
        repo.clone(),
        test_config(),
        devices(camera.clone(), decoder, now),
    );
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        repo,
        camera,
        client,
    }
}

/// Logs in and returns the bearer token.
pub async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200, "login as {} failed", username);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}
