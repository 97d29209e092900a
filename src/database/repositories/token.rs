use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::models::Token;
use crate::store::{StoreError, StoreResult, TokenStore};

pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn create(&self, token: &Token) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tokens (id, token, user_id, expires_at, created_at, is_revoked)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id)
        .bind(&token.value)
        .bind(token.user_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.is_revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(&self, value: &str) -> StoreResult<Token> {
        sqlx::query_as::<_, Token>(
            r#"
            SELECT id, token, user_id, expires_at, created_at, is_revoked
            FROM tokens
            WHERE token = $1 AND is_revoked = false AND expires_at > $2
            "#,
        )
        .bind(value)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("token"))
    }

    async fn revoke(&self, value: &str) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE tokens SET is_revoked = true WHERE token = $1 AND is_revoked = false")
                .bind(value)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("token"));
        }
        Ok(())
    }

    async fn cleanup_expired(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
