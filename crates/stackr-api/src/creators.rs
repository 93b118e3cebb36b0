//! Handlers for `/creators` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/creators/:id` | 404 if not found |
//! | `PATCH` | `/creators/:id` | Body: any subset of the profile fields |
//! | `GET`   | `/creators/:id/stacks` | `?page&limit`; paginated |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use stackr_core::{
  catalog::StackCatalog,
  creator::{Creator, CreatorPatch},
  directory::CreatorDirectory,
  id::CreatorId,
  identity::IdentityProvider,
  page::Paginated,
  stack::Stack,
  store::CatalogStore,
};

use crate::{AppState, error::ApiError, params::PageParams};

/// `GET /creators/:id`
pub async fn get_one<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<CreatorId>,
) -> Result<Json<Creator>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let creator = CreatorDirectory::new(&*state.store).find_by_external_id(&id).await?;
  Ok(Json(creator))
}

/// `PATCH /creators/:id`
pub async fn update<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<CreatorId>,
  Json(patch): Json<CreatorPatch>,
) -> Result<Json<Creator>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let creator = CreatorDirectory::new(&*state.store).update(&id, patch).await?;
  Ok(Json(creator))
}

/// `GET /creators/:id/stacks[?page=<n>][&limit=<n>]`
pub async fn stacks<S, I>(
  State(state): State<AppState<S, I>>,
  Path(id): Path<CreatorId>,
  Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Stack>>, ApiError>
where
  S: CatalogStore,
  I: IdentityProvider,
{
  let page = params.to_request()?;
  let stacks = StackCatalog::new(&*state.store).list_by_creator(&id, page).await?;
  Ok(Json(stacks))
}
