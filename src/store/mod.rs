//! Storage traits for books, tokens and users.
//!
//! Handlers only ever see `Arc<dyn ...Store>`; the Postgres repositories in
//! [`crate::database::repositories`] and the in-memory stores in [`memory`]
//! are interchangeable behind them.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, Token, User};

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Active books, newest first.
    async fn list(&self) -> StoreResult<Vec<Book>>;

    /// Fails with `NotFound` when the book is missing or soft-deleted.
    async fn get(&self, id: Uuid) -> StoreResult<Book>;

    async fn create(&self, book: Book) -> StoreResult<Book>;

    /// Persists title, author, year and `updated_at` of an active book.
    async fn update(&self, book: &Book) -> StoreResult<Book>;

    /// Marks an active book as deleted and returns the deleted record.
    async fn soft_delete(&self, id: Uuid) -> StoreResult<Book>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn create(&self, token: &Token) -> StoreResult<()>;

    /// Fails with `NotFound` when the token is unknown, revoked or expired.
    async fn find_active(&self, value: &str) -> StoreResult<Token>;

    /// Fails with `NotFound` when there is no unrevoked token with this value.
    async fn revoke(&self, value: &str) -> StoreResult<()>;

    /// Removes expired tokens and returns how many were removed.
    async fn cleanup_expired(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Only active users are returned.
    async fn find_by_username(&self, username: &str) -> StoreResult<User>;

    async fn record_login(&self, user_id: Uuid) -> StoreResult<()>;
}

/// The three stores a running service needs, already type-erased.
#[derive(Clone)]
pub struct Stores {
    pub books: Arc<dyn BookStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub users: Arc<dyn UserStore>,
}
