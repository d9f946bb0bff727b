// src/server/error.rs
//! HTTP mappings for the failure vocabularies.

use crate::error::AppError;
use crate::images::ImageProxyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl IntoResponse for ImageProxyError {
    fn into_response(self) -> Response {
        match self {
            ImageProxyError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Image not found" })),
            )
                .into_response(),
            // Relay whatever the upstream said instead of flattening to 500
            ImageProxyError::Upstream(status) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Json(json!({ "error": "Failed to fetch image" })),
            )
                .into_response(),
            ImageProxyError::Internal(err) => {
                log::error!("Image proxy failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Failure vocabulary for the page rendering endpoint.
#[derive(Debug)]
pub enum PageError {
    InvalidId,
    NotFound,
    Service(AppError),
    Internal(AppError),
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::NotionService { code, .. } if code.is_not_found() => PageError::NotFound,
            AppError::NotionService { .. } => PageError::Service(err),
            _ => PageError::Internal(err),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::InvalidId | PageError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Page not found" })),
            )
                .into_response(),
            PageError::Service(err) => {
                log::warn!("Notion API rejected page fetch: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Failed to fetch page" })),
                )
                    .into_response()
            }
            PageError::Internal(err) => {
                log::error!("Page rendering failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
