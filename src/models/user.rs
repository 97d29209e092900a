use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::UserSeed;
use crate::utils::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash, stored in the `password` column.
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Builds an active user from a seed entry, hashing its password.
    pub fn from_seed(seed: &UserSeed, cost: u32) -> Result<Self, bcrypt::BcryptError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username: seed.username.clone(),
            password_hash: hash_password(&seed.password, cost)?,
            email: seed.email.clone(),
            role: seed.role.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        })
    }

    /// A malformed stored hash counts as a failed login.
    pub fn verify_login(&self, password: &str) -> bool {
        match verify_password(password, &self.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash for {} is unusable: {}", self.username, e);
                false
            }
        }
    }
}
