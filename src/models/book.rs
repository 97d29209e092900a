use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_PUBLICATION_YEAR: i32 = 1000;
pub const MAX_PUBLICATION_YEAR: i32 = 2024;

/// A book record. `deleted_at` is set once the book has been soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    #[serde(rename = "judul")]
    #[sqlx(rename = "judul")]
    pub title: String,
    pub author: String,
    #[serde(rename = "tahun_terbit")]
    #[sqlx(rename = "tahun_terbit")]
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn new(title: String, author: String, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            author,
            year,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

pub fn is_valid_publication_year(year: i32) -> bool {
    (MIN_PUBLICATION_YEAR..=MAX_PUBLICATION_YEAR).contains(&year)
}
