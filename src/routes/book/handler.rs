use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, error::AppError, models::Book, result::ApiResult, routes::ApiJson};

use super::model::{CreateBookRequest, UpdateBookRequest};

const NOT_FOUND: &str = "Book not found";

/// Ids that are not UUIDs cannot name a stored book.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(NOT_FOUND))
}

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<ApiResult<Vec<Book>>>, AppError> {
    let books = state
        .stores
        .books
        .list()
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to fetch books"))?;

    Ok(ApiResult::list(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResult<Book>>, AppError> {
    let id = parse_id(&id)?;
    let book = state
        .stores
        .books
        .get(id)
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to fetch book"))?;

    Ok(ApiResult::success(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<ApiResult<Book>>), AppError> {
    let book = req.into_book()?;
    let book = state
        .stores
        .books
        .create(book)
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to create book"))?;

    Ok((
        StatusCode::CREATED,
        ApiResult::success_with_message("Book created successfully", book),
    ))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateBookRequest>,
) -> Result<Json<ApiResult<Book>>, AppError> {
    let id = parse_id(&id)?;
    let mut book = state
        .stores
        .books
        .get(id)
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to fetch book"))?;

    req.apply_to(&mut book)?;
    book.updated_at = Utc::now();

    let book = state
        .stores
        .books
        .update(&book)
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to update book"))?;

    tracing::info!("Updated book: {}", book.id);
    Ok(ApiResult::success_with_message("Book updated successfully", book))
}

/// Soft-deletes the book and returns its last known state.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResult<Book>>, AppError> {
    let id = parse_id(&id)?;
    let book = state
        .stores
        .books
        .soft_delete(id)
        .await
        .map_err(|e| AppError::from_store(e, NOT_FOUND, "Failed to delete book"))?;

    tracing::info!("Deleted book: {}", book.id);
    Ok(ApiResult::success_with_message("Book deleted successfully", book))
}
