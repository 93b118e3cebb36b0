//! Offset pagination shared by every listing.
//!
//! [`PageRequest::window`] gives the skip/take window a store applies to its
//! ordered query; [`PageMetadata::compute`] turns the total count of the same
//! filter into the envelope returned alongside the page. Both must be fed the
//! identical filter or the metadata and the data drift apart.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// A 1-indexed page of `limit` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page:  u64,
  pub limit: u64,
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

impl PageRequest {
  /// Both `page` and `limit` must be at least 1.
  pub fn new(page: u64, limit: u64) -> Result<Self> {
    if page == 0 {
      return Err(Error::invalid("page must be at least 1"));
    }
    if limit == 0 {
      return Err(Error::invalid("limit must be at least 1"));
    }
    Ok(Self { page, limit })
  }

  pub fn start_index(&self) -> u64 { (self.page - 1).saturating_mul(self.limit) }

  pub fn end_index(&self) -> u64 { self.page.saturating_mul(self.limit) }

  pub fn window(&self) -> Window { Window { skip: self.start_index(), take: self.limit } }
}

/// A skip/take window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub skip: u64,
  pub take: u64,
}

/// Link to an adjacent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
  pub page:  u64,
  pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
  pub total:       u64,
  pub page:        u64,
  pub limit:       u64,
  pub total_pages: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next:        Option<PageLink>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous:    Option<PageLink>,
}

impl PageMetadata {
  pub fn compute(request: PageRequest, total: u64) -> Self {
    let PageRequest { page, limit } = request;
    // Lazy: `end_index < total` implies `page < u64::MAX`.
    let next = (request.end_index() < total).then(|| PageLink { page: page + 1, limit });
    let previous = (request.start_index() > 0).then(|| PageLink { page: page - 1, limit });
    Self {
      total,
      page,
      limit,
      total_pages: total.div_ceil(limit),
      next,
      previous,
    }
  }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
  pub data:     Vec<T>,
  pub metadata: PageMetadata,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn meta(page: u64, limit: u64, total: u64) -> PageMetadata {
    PageMetadata::compute(PageRequest::new(page, limit).unwrap(), total)
  }

  #[test]
  fn zero_page_or_limit_is_rejected() {
    assert!(matches!(PageRequest::new(0, 10), Err(Error::ValidationFailed(_))));
    assert!(matches!(PageRequest::new(1, 0), Err(Error::ValidationFailed(_))));
  }

  #[test]
  fn middle_page_links_both_ways() {
    let m = meta(2, 10, 25);
    assert_eq!(m, PageMetadata {
      total:       25,
      page:        2,
      limit:       10,
      total_pages: 3,
      next:        Some(PageLink { page: 3, limit: 10 }),
      previous:    Some(PageLink { page: 1, limit: 10 }),
    });
  }

  #[test]
  fn empty_total_has_no_pages_and_no_links() {
    let m = meta(1, 10, 0);
    assert_eq!(m.total_pages, 0);
    assert!(m.next.is_none());
    assert!(m.previous.is_none());
  }

  #[test]
  fn page_past_the_end_only_links_back() {
    let m = meta(7, 10, 25);
    assert_eq!(m.total_pages, 3);
    assert!(m.next.is_none());
    assert_eq!(m.previous, Some(PageLink { page: 6, limit: 10 }));
  }

  #[test]
  fn last_representable_page_has_no_next() {
    let m = meta(u64::MAX, 10, 25);
    assert!(m.next.is_none());
    assert_eq!(m.previous, Some(PageLink { page: u64::MAX - 1, limit: 10 }));

    let m = meta(u64::MAX, u64::MAX, 25);
    assert!(m.next.is_none());
    assert_eq!(m.total_pages, 1);
  }

  #[test]
  fn exact_fit_has_no_next() {
    let m = meta(2, 10, 20);
    assert_eq!(m.total_pages, 2);
    assert!(m.next.is_none());
  }

  #[test]
  fn link_presence_law_holds_over_a_grid() {
    for total in 0..40u64 {
      for limit in 1..8u64 {
        for page in 1..12u64 {
          let m = meta(page, limit, total);
          assert_eq!(m.total_pages, total.div_ceil(limit));
          assert_eq!(m.next.is_some(), page * limit < total, "{page}/{limit}/{total}");
          assert_eq!(m.previous.is_some(), page > 1, "{page}/{limit}/{total}");
        }
      }
    }
  }

  #[test]
  fn window_matches_start_index() {
    let w = PageRequest::new(3, 7).unwrap().window();
    assert_eq!(w, Window { skip: 14, take: 7 });
  }

  #[test]
  fn absent_links_are_omitted_from_json() {
    let json = serde_json::to_value(meta(1, 10, 5)).unwrap();
    assert!(json.get("next").is_none());
    assert!(json.get("previous").is_none());
    assert_eq!(json["total_pages"], 1);
  }
}
