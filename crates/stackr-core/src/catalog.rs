//! Stack Catalog: stack CRUD and paginated listings.

use crate::{
  Error, Result,
  directory::CreatorDirectory,
  id::{CreatorId, StackId},
  page::{PageMetadata, PageRequest, Paginated},
  stack::{Category, NewStack, Stack, StackPatch},
  store::{CatalogStore, StackFilter, StackOrder, StackQuery},
  validate,
};

pub const DEFAULT_TOP_RATED: u64 = 3;

/// Caller-facing listing filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
  pub category:      Option<Category>,
  /// Matches stacks whose stored rating equals this value exactly.
  pub rating_equals: Option<f64>,
}

pub struct StackCatalog<'a, S> {
  store: &'a S,
}

impl<'a, S: CatalogStore> StackCatalog<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Create a stack owned by `input.creator_id`. The owner's snapshot is
  /// captured now and never refreshed.
  pub async fn create(&self, input: NewStack) -> Result<Stack> {
    validate::new_stack(&input)?;

    let creator = CreatorDirectory::new(self.store)
      .snapshot(&input.creator_id)
      .await
      .map_err(|e| match e {
        Error::NotFound { id, .. } => Error::CreatorNotFound(id),
        other => other,
      })?;

    self
      .store
      .insert_stack(Stack::new(input, creator))
      .await
      .map_err(Error::store)
  }

  pub async fn get(&self, id: &StackId) -> Result<Stack> {
    self
      .store
      .find_stack(id.clone())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| not_found(id))
  }

  /// Stacks matching every set field of `filter`, in insertion order.
  pub async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<Paginated<Stack>> {
    let filter = StackFilter {
      category: filter.category,
      rating: filter.rating_equals,
      creator_id: None,
    };
    self.paginate(filter, page).await
  }

  /// Stacks whose embedded creator snapshot has `creator_id`.
  pub async fn list_by_creator(
    &self,
    creator_id: &CreatorId,
    page: PageRequest,
  ) -> Result<Paginated<Stack>> {
    let filter = StackFilter { creator_id: Some(creator_id.clone()), ..Default::default() };
    self.paginate(filter, page).await
  }

  /// The `limit` highest-rated stacks. Order among equal ratings is
  /// unspecified.
  pub async fn top_rated(&self, limit: u64) -> Result<Vec<Stack>> {
    let page = PageRequest::new(1, limit)?;
    self
      .store
      .find_stacks(StackQuery {
        filter: StackFilter::default(),
        order:  StackOrder::RatingDesc,
        window: Some(page.window()),
      })
      .await
      .map_err(Error::store)
  }

  /// Update content fields. Owner, reviews and rating are untouched.
  pub async fn update(&self, id: &StackId, patch: StackPatch) -> Result<Stack> {
    validate::stack_patch(&patch)?;
    self
      .store
      .update_stack(id.clone(), patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| not_found(id))
  }

  /// Hard delete. Reviews go with the stack since they are embedded.
  pub async fn remove(&self, id: &StackId) -> Result<Stack> {
    self
      .store
      .delete_stack(id.clone())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| not_found(id))
  }

  /// Data and count queries share `filter`, so the metadata always describes
  /// the page that was fetched.
  async fn paginate(&self, filter: StackFilter, page: PageRequest) -> Result<Paginated<Stack>> {
    let data = self
      .store
      .find_stacks(StackQuery {
        filter: filter.clone(),
        order:  StackOrder::Natural,
        window: Some(page.window()),
      })
      .await
      .map_err(Error::store)?;
    let total = self.store.count_stacks(filter).await.map_err(Error::store)?;
    Ok(Paginated { data, metadata: PageMetadata::compute(page, total) })
  }
}

fn not_found(id: &StackId) -> Error { Error::NotFound { entity: "stack", id: id.to_string() } }
