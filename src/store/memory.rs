//! Process-memory stores. Each map sits behind its own `RwLock`, so concurrent
//! requests never touch unsynchronized state. Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, StoreError, StoreResult, Stores, TokenStore, UserStore};
use crate::config::UserSeed;
use crate::models::{Book, Token, User};

#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<Uuid, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> StoreResult<Vec<Book>> {
        let books = self.books.read().await;
        let mut active: Vec<Book> = books.values().filter(|b| !b.is_deleted()).cloned().collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Book> {
        self.books
            .read()
            .await
            .get(&id)
            .filter(|b| !b.is_deleted())
            .cloned()
            .ok_or(StoreError::NotFound("book"))
    }

    async fn create(&self, book: Book) -> StoreResult<Book> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> StoreResult<Book> {
        let mut books = self.books.write().await;
        let stored = books
            .get_mut(&book.id)
            .filter(|b| !b.is_deleted())
            .ok_or(StoreError::NotFound("book"))?;

        stored.title = book.title.clone();
        stored.author = book.author.clone();
        stored.year = book.year;
        stored.updated_at = book.updated_at;
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> StoreResult<Book> {
        let mut books = self.books.write().await;
        let stored = books
            .get_mut(&id)
            .filter(|b| !b.is_deleted())
            .ok_or(StoreError::NotFound("book"))?;

        stored.deleted_at = Some(Utc::now());
        Ok(stored.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create(&self, token: &Token) -> StoreResult<()> {
        self.tokens
            .write()
            .await
            .insert(token.value.clone(), token.clone());
        Ok(())
    }

    async fn find_active(&self, value: &str) -> StoreResult<Token> {
        let now = Utc::now();
        self.tokens
            .read()
            .await
            .get(value)
            .filter(|t| t.is_active_at(now))
            .cloned()
            .ok_or(StoreError::NotFound("token"))
    }

    async fn revoke(&self, value: &str) -> StoreResult<()> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(value) {
            Some(token) if !token.is_revoked => {
                token.is_revoked = true;
                Ok(())
            }
            _ => Err(StoreError::NotFound("token")),
        }
    }

    async fn cleanup_expired(&self) -> StoreResult<u64> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok((before - tokens.len()) as u64)
    }
}

/// Users keyed by username, loaded once at startup.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn from_seeds(seeds: &[UserSeed], cost: u32) -> StoreResult<Self> {
        let mut users = HashMap::with_capacity(seeds.len());
        for seed in seeds {
            let user = User::from_seed(seed, cost)?;
            users.insert(user.username.clone(), user);
        }
        Ok(Self {
            users: RwLock::new(users),
        })
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(username)
            .filter(|u| u.is_active)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    async fn record_login(&self, user_id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound("user"))?;
        user.last_login = Some(Utc::now());
        Ok(())
    }
}

impl Stores {
    pub fn memory(seeds: &[UserSeed], bcrypt_cost: u32) -> StoreResult<Self> {
        Ok(Self {
            books: Arc::new(MemoryBookStore::new()),
            tokens: Arc::new(MemoryTokenStore::new()),
            users: Arc::new(MemoryUserStore::from_seeds(seeds, bcrypt_cost)?),
        })
    }
}
