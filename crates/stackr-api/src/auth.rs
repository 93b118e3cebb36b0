//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signin` | Body: `{"credential":"..."}`; 201; creates the creator on first sight |
//! | `POST` | `/auth/login`  | Body: `{"credential":"..."}`; 404 for unknown identities |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use stackr_core::{
  creator::Creator,
  directory::CreatorDirectory,
  identity::IdentityProvider,
  store::CatalogStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CredentialBody {
  /// Opaque credential handed to the identity provider.
  pub credential: String,
}

/// `POST /auth/signin`: returns 201 + the resolved [`Creator`].
pub async fn sign_in<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<CredentialBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let creator = CreatorDirectory::new(&*state.store)
    .sign_in(&*state.identity, body.credential)
    .await?;
  Ok((StatusCode::CREATED, Json(creator)))
}

/// `POST /auth/login`
pub async fn log_in<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<CredentialBody>,
) -> Result<Json<Creator>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let creator = CreatorDirectory::new(&*state.store)
    .log_in(&*state.identity, body.credential)
    .await?;
  Ok(Json(creator))
}
