//! Handlers for `/technologies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/technologies` | Grouped by category name |
//! | `POST` | `/technologies` | Body: array of technologies; all-or-nothing |

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use stackr_core::{
  identity::IdentityProvider,
  registry::TechnologyRegistry,
  store::CatalogStore,
  technology::Technology,
};

use crate::{AppState, error::ApiError};

/// `GET /technologies`
pub async fn list<S, I>(
  State(state): State<AppState<S, I>>,
) -> Result<Json<BTreeMap<String, Vec<Technology>>>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let grouped = TechnologyRegistry::new(&*state.store)
    .list_grouped_by_category()
    .await?;
  Ok(Json(grouped))
}

/// `POST /technologies`: returns 201 + `{"inserted": <n>}`.
pub async fn create<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<Vec<Technology>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let inserted = TechnologyRegistry::new(&*state.store).bulk_insert(body).await?;
  Ok((StatusCode::CREATED, Json(json!({ "inserted": inserted }))))
}
