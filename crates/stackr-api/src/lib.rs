//! JSON REST API for Stackr.
//!
//! Exposes an axum [`Router`] backed by any [`CatalogStore`] and
//! [`IdentityProvider`]. Handlers only translate between HTTP and the core
//! services; every rule lives in `stackr-core`. TLS, timeouts and tracing are
//! layered on by the caller.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stackr_api::api_router(state))
//! ```

pub mod auth;
pub mod creators;
pub mod error;
pub mod params;
pub mod ratings;
pub mod stacks;
pub mod technologies;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stackr_core::{identity::IdentityProvider, store::CatalogStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S, I> {
  pub store:    Arc<S>,
  pub identity: Arc<I>,
}

impl<S, I> AppState<S, I> {
  pub fn new(store: Arc<S>, identity: Arc<I>) -> Self { Self { store, identity } }
}

impl<S, I> Clone for AppState<S, I> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      identity: Arc::clone(&self.identity),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, I>(state: AppState<S, I>) -> Router<()>
where
  S: CatalogStore + 'static,
  I: IdentityProvider + 'static,
{
  Router::new()
    // Identity
    .route("/auth/signin", post(auth::sign_in::<S, I>))
    .route("/auth/login", post(auth::log_in::<S, I>))
    // Creators
    .route(
      "/creators/{id}",
      get(creators::get_one::<S, I>).patch(creators::update::<S, I>),
    )
    .route("/creators/{id}/stacks", get(creators::stacks::<S, I>))
    // Stacks
    .route("/stacks", get(stacks::list::<S, I>).post(stacks::create::<S, I>))
    .route("/stacks/top", get(stacks::top_rated::<S, I>))
    .route(
      "/stacks/{id}",
      get(stacks::get_one::<S, I>)
        .patch(stacks::update::<S, I>)
        .delete(stacks::remove::<S, I>),
    )
    .route("/stacks/{id}/reviews", post(stacks::add_review::<S, I>))
    // Technologies
    .route(
      "/technologies",
      get(technologies::list::<S, I>).post(technologies::create::<S, I>),
    )
    // Ratings
    .route("/ratings/recompute", post(ratings::recompute::<S, I>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
