//! Externally stable identifiers.
//!
//! Both identifier kinds have the shape `<PREFIX>-<6 lowercase hex chars>`,
//! are generated once at creation and never change. Ids received from
//! callers are not re-validated: an id of the wrong shape simply matches
//! nothing in the store.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Six lowercase hex characters taken from a fresh v4 UUID.
pub(crate) fn short_hex() -> String {
  let mut s = Uuid::new_v4().simple().to_string();
  s.truncate(6);
  s
}

macro_rules! external_id {
  ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub const PREFIX: &'static str = $prefix;

      /// Generate a new random id.
      pub fn generate() -> Self { Self(format!("{}-{}", Self::PREFIX, short_hex())) }

      /// Wrap an id received from a caller or read back from the store.
      pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

      pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self { Self(s) }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self { Self(s.to_owned()) }
    }
  };
}

external_id!(
  /// Identifier of a [`Creator`](crate::creator::Creator), e.g. `CR-1a2b3c`.
  CreatorId,
  "CR"
);

external_id!(
  /// Identifier of a [`Stack`](crate::stack::Stack), e.g. `SR-9f8e7d`.
  StackId,
  "SR"
);

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_generated_shape(id: &str, prefix: &str) {
    let hex = id.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('-'));
    let hex = hex.unwrap_or_else(|| panic!("{id} lacks prefix {prefix}-"));
    assert_eq!(hex.len(), 6, "{id}");
    assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)), "{id}");
  }

  #[test]
  fn generated_ids_have_prefix_and_six_hex() {
    for _ in 0..64 {
      assert_generated_shape(CreatorId::generate().as_str(), CreatorId::PREFIX);
      assert_generated_shape(StackId::generate().as_str(), StackId::PREFIX);
    }
  }

  #[test]
  fn generated_ids_do_not_repeat_quickly() {
    let ids: std::collections::HashSet<_> = (0..32).map(|_| StackId::generate()).collect();
    assert!(ids.len() > 1);
  }

  #[test]
  fn serialises_as_a_bare_string() {
    let id = StackId::new("SR-00ff00");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"SR-00ff00\"");
    let back: StackId = serde_json::from_str("\"SR-00ff00\"").unwrap();
    assert_eq!(back, id);
  }
}
