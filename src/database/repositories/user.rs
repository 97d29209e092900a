use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;
use crate::store::{StoreError, StoreResult, UserStore};

/// `users` table access. Only active users can be looked up.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, role, is_active, created_at, updated_at, last_login
            FROM users
            WHERE username = $1 AND is_active = true
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("user"))
    }

    async fn record_login(&self, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_user_seeds;
    use crate::database::{migrate, seed_users};

    // Needs a disposable database: DATABASE_URL=... cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn record_login_reports_unknown_user() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = PgPool::connect(&url).await.unwrap();
        migrate(&pool).await.unwrap();
        seed_users(&pool, &default_user_seeds(), 4).await.unwrap();

        let repo = UserRepository::new(pool);
        let admin = repo.find_by_username("admin").await.unwrap();
        repo.record_login(admin.id).await.unwrap();
        assert!(repo.find_by_username("admin").await.unwrap().last_login.is_some());

        let err = repo.record_login(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("user")));
    }
}
