//! `POST /ratings/recompute`: run one rating recomputation pass on demand.
//!
//! The same pass the server's midnight scheduler runs. Returns
//! `{"updated": <n>}` with the number of stacks whose rating was written.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use stackr_core::{identity::IdentityProvider, reviews::ReviewAggregator, store::CatalogStore};

use crate::{AppState, error::ApiError};

pub async fn recompute<S, I>(
  State(state): State<AppState<S, I>>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let updated = ReviewAggregator::new(&*state.store).recompute_all_ratings().await?;
  Ok(Json(json!({ "updated": updated })))
}
