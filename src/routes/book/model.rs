use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Book, is_valid_publication_year};

pub const INVALID_BOOK: &str =
    "Invalid book data. Judul and Author are required, TahunTerbit must be between 1000-2024";
pub const INVALID_YEAR: &str = "TahunTerbit must be between 1000-2024";

/// Missing fields decode as empty/zero and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookRequest {
    #[serde(rename = "judul")]
    pub title: String,
    pub author: String,
    #[serde(rename = "tahun_terbit")]
    pub year: i32,
}

impl CreateBookRequest {
    pub fn into_book(self) -> Result<Book, AppError> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() || !is_valid_publication_year(self.year) {
            return Err(AppError::validation(INVALID_BOOK));
        }
        Ok(Book::new(title.to_string(), author.to_string(), self.year))
    }
}

/// Partial update. Empty strings and a zero year leave the field unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBookRequest {
    #[serde(rename = "judul")]
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "tahun_terbit")]
    pub year: Option<i32>,
}

impl UpdateBookRequest {
    /// Validates before touching `book`, so a rejected request changes nothing.
    pub fn apply_to(self, book: &mut Book) -> Result<(), AppError> {
        let year = match self.year {
            None | Some(0) => None,
            Some(year) if is_valid_publication_year(year) => Some(year),
            Some(_) => return Err(AppError::validation(INVALID_YEAR)),
        };

        if let Some(title) = non_blank(self.title) {
            book.title = title;
        }
        if let Some(author) = non_blank(self.author) {
            book.author = author;
        }
        if let Some(year) = year {
            book.year = year;
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
