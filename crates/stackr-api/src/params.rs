//! Query-string parameters shared by listing endpoints.

use serde::Deserialize;
use stackr_core::page::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest};

use crate::error::ApiError;

/// `?page=<n>&limit=<n>`; both default when absent.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page:  Option<u64>,
  pub limit: Option<u64>,
}

impl PageParams {
  pub fn to_request(&self) -> Result<PageRequest, ApiError> {
    Ok(PageRequest::new(
      self.page.unwrap_or(DEFAULT_PAGE),
      self.limit.unwrap_or(DEFAULT_LIMIT),
    )?)
  }
}
