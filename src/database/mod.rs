// Postgres backend: pool setup, schema, seed data and repositories.

pub mod repositories;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::{Config, UserSeed};
use crate::models::User;
use crate::store::{StoreResult, Stores};

pub use repositories::{BookRepository, TokenRepository, UserRepository};

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        judul VARCHAR(255) NOT NULL,
        author VARCHAR(255) NOT NULL,
        tahun_terbit INTEGER NOT NULL CHECK (tahun_terbit >= 1000 AND tahun_terbit <= 2024),
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        deleted_at TIMESTAMPTZ NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username VARCHAR(50) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL DEFAULT '',
        role VARCHAR(20) NOT NULL DEFAULT 'user',
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_login TIMESTAMPTZ NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tokens (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        token VARCHAR(255) UNIQUE NOT NULL,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        is_revoked BOOLEAN NOT NULL DEFAULT false
    )
    "#,
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_books_author ON books(author)",
    "CREATE INDEX IF NOT EXISTS idx_books_tahun_terbit ON books(tahun_terbit)",
    "CREATE INDEX IF NOT EXISTS idx_books_created_at ON books(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_tokens_user_id ON tokens(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tokens_expires_at ON tokens(expires_at)",
];

const UPDATED_AT_TRIGGERS: &str = r#"
    CREATE OR REPLACE FUNCTION update_updated_at_column()
    RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = CURRENT_TIMESTAMP;
        RETURN NEW;
    END;
    $$ language 'plpgsql';

    DROP TRIGGER IF EXISTS update_books_updated_at ON books;
    CREATE TRIGGER update_books_updated_at
        BEFORE UPDATE ON books
        FOR EACH ROW
        EXECUTE FUNCTION update_updated_at_column();

    DROP TRIGGER IF EXISTS update_users_updated_at ON users;
    CREATE TRIGGER update_users_updated_at
        BEFORE UPDATE ON users
        FOR EACH ROW
        EXECUTE FUNCTION update_updated_at_column();
"#;

pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'book_service';").await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connected");
    Ok(pool)
}

/// Creates tables, indexes and the `updated_at` triggers. Index and trigger
/// failures are logged and tolerated; table failures are not.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    for &statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }

    for &statement in CREATE_INDEXES {
        if let Err(e) = sqlx::query(statement).execute(pool).await {
            tracing::warn!("Failed to create index: {}", e);
        }
    }

    if let Err(e) = sqlx::raw_sql(UPDATED_AT_TRIGGERS).execute(pool).await {
        tracing::warn!("Failed to create triggers: {}", e);
    }

    tracing::info!("Database tables ready");
    Ok(())
}

/// Inserts `seeds` when the users table is empty. Returns the number inserted.
pub async fn seed_users(pool: &PgPool, seeds: &[UserSeed], bcrypt_cost: u32) -> StoreResult<usize> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for seed in seeds {
        let user = User::from_seed(seed, bcrypt_cost)?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password, email, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.role)
        .execute(pool)
        .await?;
        inserted += result.rows_affected() as usize;
    }

    tracing::info!("Seeded {} users", inserted);
    Ok(inserted)
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            books: Arc::new(BookRepository::new(pool.clone())),
            tokens: Arc::new(TokenRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }
}
