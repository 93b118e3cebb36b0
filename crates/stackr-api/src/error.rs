//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stackr_core::ErrorKind;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] stackr_core::Error),
}

impl ApiError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ApiError::Core(e) => e.kind(),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self.kind() {
      ErrorKind::NotFound | ErrorKind::CreatorNotFound | ErrorKind::StackNotFound => {
        StatusCode::NOT_FOUND
      }
      ErrorKind::DuplicateIdentity => StatusCode::CONFLICT,
      ErrorKind::ValidationFailed | ErrorKind::RegistryWriteFailed => StatusCode::BAD_REQUEST,
      ErrorKind::VerificationFailed => StatusCode::UNAUTHORIZED,
      ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
