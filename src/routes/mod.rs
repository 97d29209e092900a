pub mod auth;
pub mod book;
pub mod health;

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections render as the usual error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
