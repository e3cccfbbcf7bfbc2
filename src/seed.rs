// src/seed.rs

//! Demo accounts created at start-up.

use crate::{
    error::AppError,
    models::{
        student::{NewStudent, StudentStatus},
        user::{NewUser, Role},
    },
    repository::Repository,
    utils::hash::hash_password,
};

pub struct DemoAccount {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
}

pub const DEMO_ADMIN: DemoAccount = DemoAccount {
    username: "admin",
    email: "admin@narang.id",
    password: "admin123",
    name: "Admin Narang",
    role: Role::Admin,
};

pub const DEMO_STUDENT: DemoAccount = DemoAccount {
    username: "siswa",
    email: "siswa@narang.id",
    password: "siswa123",
    name: "Siswa Demo",
    role: Role::Student,
};

pub const DEMO_STUDENT_CODE: &str = "SD2024001";
pub const DEMO_STUDENT_BARCODE: &str = "NRGDEMO123";
pub const DEMO_STUDENT_CLASS: &str = "4";

/// Creates the demo admin and demo student unless they already exist.
pub async fn seed_demo_accounts(repo: &Repository) -> Result<(), AppError> {
    for account in [&DEMO_ADMIN, &DEMO_STUDENT] {
        if repo.find_user_by_login(account.username).await?.is_some() {
            continue;
        }

        tracing::info!("Seeding demo account: {}", account.username);
        let user_id = repo
            .create_user(NewUser {
                username: account.username.to_string(),
                email: Some(account.email.to_string()),
                name: account.name.to_string(),
                password: hash_password(account.password)?,
                role: account.role,
            })
            .await?;

        if account.role == Role::Student {
            repo.create_student(NewStudent {
                user_id,
                name: account.name.to_string(),
                student_id: DEMO_STUDENT_CODE.to_string(),
                barcode: DEMO_STUDENT_BARCODE.to_string(),
                class: DEMO_STUDENT_CLASS.to_string(),
                parent_name: "Orang Tua Demo".to_string(),
                parent_phone: "08123456789".to_string(),
                birth_date: None,
                status: StudentStatus::Active,
            })
            .await?;
        }
    }
    Ok(())
}
