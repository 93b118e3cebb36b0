//! Stacks, the aggregate root, and their embedded reviews.
//!
//! A stack embeds everything its read path needs: a frozen
//! [`CreatorSnapshot`], technologies copied by value, and the append-only
//! review log. `rating` is a materialised aggregate of that log, refreshed by
//! [`ReviewAggregator::recompute_all_ratings`](crate::reviews::ReviewAggregator::recompute_all_ratings)
//! only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  creator::CreatorSnapshot,
  id::{CreatorId, StackId},
  technology::Technology,
};

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  Programming,
  Design,
  Marketing,
  Business,
}

impl Category {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Review ──────────────────────────────────────────────────────────────────

/// One review in a stack's review log. Immutable once appended; identified
/// only by its position in [`Stack::reviews`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub stack_id:   StackId,
  pub creator:    CreatorSnapshot,
  /// Expected within `1.0..=5.0`.
  pub rate:       f64,
  pub comment:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`ReviewAggregator::add_review`](crate::reviews::ReviewAggregator::add_review).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
  pub stack_id:   StackId,
  pub creator_id: CreatorId,
  pub rate:       f64,
  pub comment:    String,
}

// ─── Stack ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
  pub id:           StackId,
  pub title:        String,
  pub description:  String,
  pub category:     Category,
  pub technologies: Vec<Technology>,
  pub tags:         Vec<String>,
  /// Frozen at creation time.
  pub creator:      CreatorSnapshot,
  pub reviews:      Vec<Review>,
  /// Mean of `reviews[].rate` as of the last recomputation pass; `0.0` until
  /// the first pass that sees a review.
  pub rating:       f64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Stack {
  /// Build an unrated, unreviewed stack owned by `creator`.
  pub fn new(input: NewStack, creator: CreatorSnapshot) -> Self {
    let now = Utc::now();
    Self {
      id: StackId::generate(),
      title: input.title,
      description: input.description,
      category: input.category,
      technologies: input.technologies,
      tags: input.tags,
      creator,
      reviews: Vec::new(),
      rating: 0.0,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Input to [`StackCatalog::create`](crate::catalog::StackCatalog::create).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStack {
  pub title:        String,
  pub description:  String,
  pub category:     Category,
  #[serde(default)]
  pub technologies: Vec<Technology>,
  #[serde(default)]
  pub tags:         Vec<String>,
  pub creator_id:   CreatorId,
}

/// Partial content update. Identity, owner, reviews and rating are not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackPatch {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub category:     Option<Category>,
  pub technologies: Option<Vec<Technology>>,
  pub tags:         Option<Vec<String>>,
}
