//! Daily rating recomputation.
//!
//! [`run`] sleeps until the next midnight UTC, runs one
//! [`recompute_all_ratings`](ReviewAggregator::recompute_all_ratings) pass and
//! repeats. A failed pass is logged and retried at the following midnight.

use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Days, NaiveTime, Utc};
use stackr_core::{reviews::ReviewAggregator, store::CatalogStore};

/// The first midnight UTC strictly after `now`.
pub fn next_midnight_after(now: DateTime<Utc>) -> DateTime<Utc> {
  (now.date_naive() + Days::new(1))
    .and_time(NaiveTime::default())
    .and_utc()
}

/// Run one recomputation pass, logging its outcome.
///
/// Returns the number of stacks updated, or `None` if the pass failed.
pub async fn run_once<S: CatalogStore>(store: &S) -> Option<usize> {
  let started = Instant::now();
  match ReviewAggregator::new(store).recompute_all_ratings().await {
    Ok(updated) => {
      tracing::info!(
        updated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "recomputed stack ratings"
      );
      Some(updated)
    }
    Err(e) => {
      tracing::error!(error = %e, "rating recomputation failed");
      None
    }
  }
}

/// Recompute ratings every midnight UTC, forever.
pub async fn run<S: CatalogStore>(store: Arc<S>) {
  loop {
    let now = Utc::now();
    let next = next_midnight_after(now);
    tracing::debug!(%next, "next rating recomputation scheduled");
    tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;
    run_once(&*store).await;
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use stackr_core::{
    catalog::StackCatalog,
    directory::CreatorDirectory,
    identity::VerifiedIdentity,
    reviews::ReviewAggregator,
    stack::{Category, NewReview, NewStack},
  };
  use stackr_store_sqlite::SqliteStore;

  use super::*;

  fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
  }

  #[test]
  fn midday_rolls_to_next_midnight() {
    assert_eq!(next_midnight_after(utc(2024, 3, 14, 12, 30, 0)), utc(2024, 3, 15, 0, 0, 0));
  }

  #[test]
  fn exactly_midnight_waits_a_full_day() {
    assert_eq!(next_midnight_after(utc(2024, 3, 14, 0, 0, 0)), utc(2024, 3, 15, 0, 0, 0));
  }

  #[test]
  fn crosses_month_and_year_boundaries() {
    assert_eq!(next_midnight_after(utc(2024, 2, 29, 23, 59, 59)), utc(2024, 3, 1, 0, 0, 0));
    assert_eq!(next_midnight_after(utc(2024, 12, 31, 18, 0, 0)), utc(2025, 1, 1, 0, 0, 0));
  }

  #[tokio::test]
  async fn run_once_updates_reviewed_stacks() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let creator = CreatorDirectory::new(&store)
      .resolve_or_create(VerifiedIdentity::new("sub-1", "ada@example.com", "Ada", ""))
      .await
      .unwrap();
    let catalog = StackCatalog::new(&store);
    let stack = catalog
      .create(NewStack {
        title:        "Reviewed".into(),
        description:  "Has reviews".into(),
        category:     Category::Business,
        technologies: vec![],
        tags:         vec![],
        creator_id:   creator.id.clone(),
      })
      .await
      .unwrap();
    catalog
      .create(NewStack {
        title:        "Quiet".into(),
        description:  "No reviews".into(),
        category:     Category::Business,
        technologies: vec![],
        tags:         vec![],
        creator_id:   creator.id.clone(),
      })
      .await
      .unwrap();
    for rate in [2.0, 4.0] {
      ReviewAggregator::new(&store)
        .add_review(NewReview {
          stack_id:   stack.id.clone(),
          creator_id: creator.id.clone(),
          rate,
          comment:    "fine".into(),
        })
        .await
        .unwrap();
    }

    assert_eq!(run_once(&store).await, Some(1));
    assert_eq!(catalog.get(&stack.id).await.unwrap().rating, 3.0);
  }
}
