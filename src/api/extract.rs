//! Extractors whose rejections answer with the `{"error": ...}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::error::ApiError;

/// `axum::Json` with an [`ApiError`] rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` with an [`ApiError`] rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
