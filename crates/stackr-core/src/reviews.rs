//! Review Aggregator: the review log and the rating derived from it.
//!
//! Writes and the aggregate are split in two phases. [`ReviewAggregator::add_review`]
//! only appends to a stack's review log; the `rating` field is rewritten by
//! [`ReviewAggregator::recompute_all_ratings`], which an external scheduler
//! runs once a day. A stack's rating therefore lags reviews appended since the
//! last pass.
//!
//! The pass reads each stack and then writes its rating in a separate store
//! call, so a review appended in between is missed until the next pass. That
//! race is accepted: the pass is idempotent and the next run converges.

use chrono::Utc;

use crate::{
  Error, Result,
  directory::CreatorDirectory,
  stack::{NewReview, Review, Stack},
  store::{CatalogStore, StackQuery},
  validate,
};

pub struct ReviewAggregator<'a, S> {
  store: &'a S,
}

impl<'a, S: CatalogStore> ReviewAggregator<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Append a review to its stack's log and return the stack after the
  /// append. The stack's rating is left as is.
  pub async fn add_review(&self, input: NewReview) -> Result<Stack> {
    validate::new_review(&input)?;

    let exists = self
      .store
      .find_stack(input.stack_id.clone())
      .await
      .map_err(Error::store)?
      .is_some();
    if !exists {
      return Err(Error::StackNotFound(input.stack_id.to_string()));
    }

    let creator = CreatorDirectory::new(self.store)
      .snapshot(&input.creator_id)
      .await
      .map_err(|e| match e {
        Error::NotFound { id, .. } => Error::CreatorNotFound(id),
        other => other,
      })?;

    let review = Review {
      stack_id: input.stack_id.clone(),
      creator,
      rate: input.rate,
      comment: input.comment,
      created_at: Utc::now(),
    };

    // The stack may have been removed since the existence check.
    self
      .store
      .push_review(input.stack_id.clone(), review)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::StackNotFound(input.stack_id.to_string()))
  }

  /// Set every reviewed stack's rating to the mean of its review rates.
  /// Stacks without reviews keep their current rating. Returns the number of
  /// stacks whose rating was written.
  pub async fn recompute_all_ratings(&self) -> Result<usize> {
    let stacks = self
      .store
      .find_stacks(StackQuery::default())
      .await
      .map_err(Error::store)?;

    let mut updated = 0;
    for stack in stacks {
      let Some(rating) = mean_rating(&stack.reviews) else {
        continue;
      };
      // A stack deleted mid-pass has nothing left to rate.
      if self
        .store
        .set_rating(stack.id, rating)
        .await
        .map_err(Error::store)?
        .is_some()
      {
        updated += 1;
      }
    }
    Ok(updated)
  }
}

/// Arithmetic mean of the review rates, `None` for an empty log.
pub fn mean_rating(reviews: &[Review]) -> Option<f64> {
  if reviews.is_empty() {
    return None;
  }
  let sum: f64 = reviews.iter().map(|r| r.rate).sum();
  Some(sum / reviews.len() as f64)
}
