// src/session/mod.rs

//! Authenticated identity carried between requests.
//!
//! The identity is serialized into a signed token which the client presents
//! as `Authorization: Bearer <token>`. [`SessionStore`] is injected through
//! the application state; nothing reads ambient storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{student::Student, user::Role, user::User},
};

pub mod gate;

/// The identity a signed-in user carries around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
    /// Class of a student, e.g. "4".
    pub kelas: Option<String>,
    /// Human readable student code of a student.
    pub student_id: Option<String>,
    pub barcode: Option<String>,
    /// Epoch milliseconds.
    pub login_time: i64,
}

/// What the attendance workflow needs to know about a student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentIdentity {
    pub student_id: String,
    pub name: String,
    pub barcode: String,
}

impl Session {
    pub fn for_user(user: &User, student: Option<&Student>, login_time: i64) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            kelas: student.map(|s| s.class.clone()),
            student_id: student.map(|s| s.student_id.clone()),
            barcode: student.map(|s| s.barcode.clone()),
            login_time,
        }
    }

    /// The linked student, if this is a student session with complete data.
    pub fn student(&self) -> Option<StudentIdentity> {
        if self.role != Role::Student {
            return None;
        }
        match (&self.student_id, &self.barcode) {
            (Some(student_id), Some(barcode)) if !student_id.is_empty() => {
                Some(StudentIdentity {
                    student_id: student_id.clone(),
                    name: self.name.clone(),
                    barcode: barcode.clone(),
                })
            }
            _ => None,
        }
    }
}

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// Token id, used to revoke on logout.
    jti: String,
    /// Expiration time as Unix timestamp.
    exp: usize,
    #[serde(flatten)]
    session: Session,
}

/// Issues, reads and revokes session tokens.
#[derive(Clone)]
pub struct SessionStore {
    secret: Arc<str>,
    expiration_seconds: u64,
    /// Revoked token ids and when they would have expired anyway.
    revoked: Arc<RwLock<HashMap<String, usize>>>,
}

impl SessionStore {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            secret: Arc::from(secret),
            expiration_seconds,
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Serializes the identity into a signed token.
    pub fn save_session(&self, session: &Session) -> Result<String, AppError> {
        let expiration = unix_now()? + self.expiration_seconds as usize;

        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expiration,
            session: session.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Reads the identity back.
    ///
    /// Absent, corrupt, expired, foreign or cleared tokens all mean "no
    /// session"; this never fails.
    pub fn load_session(&self, token: Option<&str>) -> Option<Session> {
        let claims = self.decode_claims(token?)?;

        let revoked = match self.revoked.read() {
            Ok(revoked) => revoked.contains_key(&claims.jti),
            Err(poisoned) => poisoned.into_inner().contains_key(&claims.jti),
        };
        if revoked {
            tracing::debug!("Rejected cleared session {}", claims.jti);
            return None;
        }

        Some(claims.session)
    }

    /// Logs the token out. Returns whether it was a live session.
    pub fn clear_session(&self, token: &str) -> bool {
        let Some(claims) = self.decode_claims(token) else {
            return false;
        };

        let mut revoked = match self.revoked.write() {
            Ok(revoked) => revoked,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Ok(now) = unix_now() {
            revoked.retain(|_, exp| *exp > now);
        }
        revoked.insert(claims.jti, claims.exp).is_none()
    }

    fn decode_claims(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Ignoring unusable session token: {}", e);
                None
            }
        }
    }
}

fn unix_now() -> Result<usize, AppError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize)
}
