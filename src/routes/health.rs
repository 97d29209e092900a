use axum::{Json, response::Html};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        message: "Server is running",
    })
}

pub async fn docs() -> Html<&'static str> {
    Html(include_str!("docs.html"))
}
