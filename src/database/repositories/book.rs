use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Book;
use crate::store::{BookStore, StoreError, StoreResult};

/// `books` table access. Deleted rows stay in the table with `deleted_at` set.
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn list(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, judul, author, tahun_terbit, created_at, updated_at, deleted_at
            FROM books
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, judul, author, tahun_terbit, created_at, updated_at, deleted_at
            FROM books
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("book"))
    }

    async fn create(&self, book: Book) -> StoreResult<Book> {
        let result = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, judul, author, tahun_terbit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, judul, author, tahun_terbit, created_at, updated_at, deleted_at
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(book.created_at)
        .bind(book.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => {
                tracing::info!("Created book: {}", created.id);
                Ok(created)
            }
            Err(e) => {
                tracing::error!("Failed to create book: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn update(&self, book: &Book) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET judul = $2, author = $3, tahun_terbit = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, judul, author, tahun_terbit, created_at, updated_at, deleted_at
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(book.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("book"))
    }

    async fn soft_delete(&self, id: Uuid) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET deleted_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, judul, author, tahun_terbit, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("book"))
    }
}
