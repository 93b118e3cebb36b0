//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is a typed rendition of a document store: one collection each for
//! creators, technologies and stacks, with find / count / insert / update /
//! delete operations keyed by fields. Every mutating method touches exactly one
//! document and must be applied atomically by the backend; nothing here
//! assumes cross-document transactions, except that
//! [`CatalogStore::insert_technologies`] is all-or-nothing.
//!
//! Implemented by storage backends (e.g. `stackr-store-sqlite`). The services
//! in this crate depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  creator::{Creator, CreatorPatch},
  id::{CreatorId, StackId},
  page::Window,
  stack::{Category, Review, Stack, StackPatch},
  technology::Technology,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Single-creator lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorQuery {
  Id(CreatorId),
  /// The identity provider's `sub` claim stored on the creator.
  Subject(String),
  /// The email stored in the creator's identity payload.
  Email(String),
  Username(String),
}

/// The unique creator key an insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorConflict {
  Id,
  Subject,
  /// Only non-empty emails are unique.
  Email,
  Username,
}

/// Equality filters over stacks; set fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackFilter {
  pub category:   Option<Category>,
  /// Exact match on the stored rating, not a threshold.
  pub rating:     Option<f64>,
  /// Matches the id inside the embedded creator snapshot.
  pub creator_id: Option<CreatorId>,
}

/// Result ordering for [`CatalogStore::find_stacks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackOrder {
  /// Insertion order.
  #[default]
  Natural,
  /// Highest rating first. Equal ratings come back in an unspecified order.
  RatingDesc,
}

/// Parameters for [`CatalogStore::find_stacks`].
#[derive(Debug, Clone, Default)]
pub struct StackQuery {
  pub filter: StackFilter,
  pub order:  StackOrder,
  /// `None` returns every matching stack.
  pub window: Option<Window>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Stackr catalog backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Creators ──────────────────────────────────────────────────────────

  /// Persist a new creator. A collision on a unique key is reported as
  /// `Ok(Err(conflict))` and leaves the store unchanged.
  fn insert_creator(
    &self,
    creator: Creator,
  ) -> impl Future<Output = Result<Result<Creator, CreatorConflict>, Self::Error>> + Send + '_;

  fn find_creator(
    &self,
    query: CreatorQuery,
  ) -> impl Future<Output = Result<Option<Creator>, Self::Error>> + Send + '_;

  /// Merge `patch` into the creator and return the updated record, or `None`
  /// if no creator has `id`.
  fn update_creator(
    &self,
    id: CreatorId,
    patch: CreatorPatch,
  ) -> impl Future<Output = Result<Option<Creator>, Self::Error>> + Send + '_;

  // ── Technologies ──────────────────────────────────────────────────────

  /// Insert every record or none of them.
  fn insert_technologies(
    &self,
    technologies: Vec<Technology>,
  ) -> impl Future<Output = Result<Vec<Technology>, Self::Error>> + Send + '_;

  /// Every registry entry, in store iteration order.
  fn find_technologies(
    &self,
  ) -> impl Future<Output = Result<Vec<Technology>, Self::Error>> + Send + '_;

  // ── Stacks ────────────────────────────────────────────────────────────

  fn insert_stack(
    &self,
    stack: Stack,
  ) -> impl Future<Output = Result<Stack, Self::Error>> + Send + '_;

  fn find_stack(
    &self,
    id: StackId,
  ) -> impl Future<Output = Result<Option<Stack>, Self::Error>> + Send + '_;

  fn find_stacks(
    &self,
    query: StackQuery,
  ) -> impl Future<Output = Result<Vec<Stack>, Self::Error>> + Send + '_;

  /// Count the stacks matching `filter`; pairs with `find_stacks` for
  /// pagination metadata.
  fn count_stacks(
    &self,
    filter: StackFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Atomically append `review` to the stack's review log. Returns the stack
  /// after the append, or `None` if it does not exist.
  fn push_review(
    &self,
    id: StackId,
    review: Review,
  ) -> impl Future<Output = Result<Option<Stack>, Self::Error>> + Send + '_;

  /// Overwrite the stored rating. Returns `None` if the stack does not exist.
  fn set_rating(
    &self,
    id: StackId,
    rating: f64,
  ) -> impl Future<Output = Result<Option<Stack>, Self::Error>> + Send + '_;

  /// Merge content fields from `patch`. Returns `None` if the stack does not
  /// exist.
  fn update_stack(
    &self,
    id: StackId,
    patch: StackPatch,
  ) -> impl Future<Output = Result<Option<Stack>, Self::Error>> + Send + '_;

  /// Hard-delete the stack and return it.
  fn delete_stack(
    &self,
    id: StackId,
  ) -> impl Future<Output = Result<Option<Stack>, Self::Error>> + Send + '_;
}
