use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `Json` body whose rejections come back in the API envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` string whose rejections come back in the API envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
