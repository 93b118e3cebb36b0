//! Handlers for `/stacks` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/stacks` | `?page&limit&category&rating`; `rating` is an exact match |
//! | `POST`   | `/stacks` | Body: [`NewStack`]; returns 201 + stored stack |
//! | `GET`    | `/stacks/top` | `?limit` (default 3) |
//! | `GET`    | `/stacks/:id` | 404 if not found |
//! | `PATCH`  | `/stacks/:id` | Body: [`StackPatch`] |
//! | `DELETE` | `/stacks/:id` | Returns the deleted stack |
//! | `POST`   | `/stacks/:id/reviews` | Body: [`ReviewBody`]; returns 201 + the stack |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use stackr_core::{
  catalog::{DEFAULT_TOP_RATED, ListFilter, StackCatalog},
  id::{CreatorId, StackId},
  identity::IdentityProvider,
  page::Paginated,
  reviews::ReviewAggregator,
  stack::{Category, NewReview, NewStack, Stack, StackPatch},
  store::CatalogStore,
};

use crate::{AppState, error::ApiError, params::PageParams};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:     Option<u64>,
  pub limit:    Option<u64>,
  pub category: Option<Category>,
  /// Stacks whose rating equals this value exactly.
  pub rating:   Option<f64>,
}

impl ListParams {
  fn page_params(&self) -> PageParams { PageParams { page: self.page, limit: self.limit } }
}

/// `GET /stacks[?page=<n>][&limit=<n>][&category=<c>][&rating=<r>]`
pub async fn list<S, I>(
  State(state): State<AppState<S, I>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Paginated<Stack>>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let page = params.page_params().to_request()?;
  let filter = ListFilter { category: params.category, rating_equals: params.rating };
  let stacks = StackCatalog::new(&*state.store).list(filter, page).await?;
  Ok(Json(stacks))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /stacks`: returns 201 + the stored [`Stack`].
pub async fn create<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<NewStack>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let stack = StackCatalog::new(&*state.store).create(body).await?;
  Ok((StatusCode::CREATED, Json(stack)))
}

// ─── Top rated ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
  pub limit: Option<u64>,
}

/// `GET /stacks/top[?limit=<n>]`
pub async fn top_rated<S, I>(
  State(state): State<AppState<S, I>>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<Stack>>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let stacks = StackCatalog::new(&*state.store)
    .top_rated(params.limit.unwrap_or(DEFAULT_TOP_RATED))
    .await?;
  Ok(Json(stacks))
}

// ─── Single stack ─────────────────────────────────────────────────────────────

/// `GET /stacks/:id`
pub async fn get_one<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<StackId>,
) -> Result<Json<Stack>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  Ok(Json(StackCatalog::new(&*state.store).get(&id).await?))
}

/// `PATCH /stacks/:id`
pub async fn update<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<StackId>,
  Json(patch): Json<StackPatch>,
) -> Result<Json<Stack>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  Ok(Json(StackCatalog::new(&*state.store).update(&id, patch).await?))
}

/// `DELETE /stacks/:id`
pub async fn remove<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<StackId>,
) -> Result<Json<Stack>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  Ok(Json(StackCatalog::new(&*state.store).remove(&id).await?))
}

// ─── Reviews ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub creator_id: CreatorId,
  pub rate:       f64,
  pub comment:    String,
}

/// `POST /stacks/:id/reviews`. The stack's rating is refreshed by the next
/// recomputation pass, not by this call.
pub async fn add_review<S, I>(
  State(state): State<AppState<S, I>>,
  Path(stack_id): Path<StackId>,
  Json(body): Json<ReviewBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let input = NewReview {
    stack_id,
    creator_id: body.creator_id,
    rate: body.rate,
    comment: body.comment,
  };
  let stack = ReviewAggregator::new(&*state.store).add_review(input).await?;
  Ok((StatusCode::CREATED, Json(stack)))
}
