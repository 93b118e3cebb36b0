//! Reusable technology descriptors.

use serde::{Deserialize, Serialize};

/// A technology descriptor. Used both as a registry entry and, copied by
/// value, inside a [`Stack`](crate::stack::Stack).
///
/// No uniqueness is enforced: the registry may hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
  pub name:        String,
  /// Free-form grouping key, e.g. `"frontend"` or `"database"`.
  pub category:    String,
  #[serde(default)]
  pub tag:         String,
  #[serde(default)]
  pub website:     String,
  #[serde(default)]
  pub description: String,
}
