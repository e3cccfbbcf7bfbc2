// src/repository/users.rs

use chrono::Utc;

use super::{RepoResult, Repository, RowParser, format_ts, new_id};
use crate::models::user::{NewUser, User};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: Option<String>,
    name: String,
    password: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = super::RepoError;

    fn try_from(row: UserRow) -> RepoResult<Self> {
        let p = RowParser::new("users", &row.id);
        Ok(User {
            role: p.enumeration("role", &row.role)?,
            created_at: p.timestamp("created_at", &row.created_at)?,
            updated_at: p.timestamp("updated_at", &row.updated_at)?,
            id: row.id,
            username: row.username,
            email: row.email,
            name: row.name,
            password: row.password,
        })
    }
}

const USER_COLUMNS: &str =
    "SELECT id, username, email, name, password, role, created_at, updated_at FROM users";

impl Repository {
    pub async fn create_user(&self, data: NewUser) -> RepoResult<String> {
        let id = new_id();
        let now = format_ts(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, password, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password)
        .bind(data.role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_user(&self, id: &str) -> RepoResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Looks a user up by username or, failing that, by email.
    pub async fn find_user_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "{} WHERE username = ? OR email = ? ORDER BY username = ? DESC LIMIT 1",
            USER_COLUMNS
        ))
        .bind(login)
        .bind(login)
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
