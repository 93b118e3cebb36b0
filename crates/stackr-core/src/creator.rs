//! Creators and the snapshots embedded in stacks and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{id::CreatorId, identity::VerifiedIdentity};

pub const DEFAULT_EXPERTISE: &str = "Software Engineer";
pub const DEFAULT_BIO: &str = "I am a software engineer";

/// A creator's full identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
  pub id:         CreatorId,
  pub name:       String,
  /// Unique across all creators.
  pub username:   String,
  pub avatar:     String,
  pub expertise:  String,
  pub bio:        String,
  pub github:     Option<String>,
  pub twitter:    Option<String>,
  /// The identity payload this creator was created from.
  pub identity:   VerifiedIdentity,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Creator {
  /// Build a brand-new creator for a never-seen identity.
  ///
  /// `username` is chosen by the caller (see [`derive_username`]).
  pub fn from_identity(identity: VerifiedIdentity, username: String) -> Self {
    let now = Utc::now();
    Self {
      id: CreatorId::generate(),
      name: identity.name.clone(),
      username,
      avatar: identity.picture.clone(),
      expertise: DEFAULT_EXPERTISE.to_owned(),
      bio: DEFAULT_BIO.to_owned(),
      github: None,
      twitter: None,
      identity,
      created_at: now,
      updated_at: now,
    }
  }

  /// Project the embeddable fields. The result never changes afterwards,
  /// even if this creator's profile does.
  pub fn snapshot(&self) -> CreatorSnapshot {
    CreatorSnapshot {
      id:        self.id.clone(),
      name:      self.name.clone(),
      username:  self.username.clone(),
      avatar:    self.avatar.clone(),
      expertise: self.expertise.clone(),
    }
  }
}

/// A frozen copy of a creator's public fields, embedded by value in stacks and
/// reviews. May be stale relative to the live [`Creator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorSnapshot {
  pub id:        CreatorId,
  pub name:      String,
  pub username:  String,
  pub avatar:    String,
  pub expertise: String,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorPatch {
  pub name:      Option<String>,
  pub username:  Option<String>,
  pub avatar:    Option<String>,
  pub expertise: Option<String>,
  pub bio:       Option<String>,
  pub github:    Option<String>,
  pub twitter:   Option<String>,
}

/// Username derived from a display name: whitespace removed, lowercased.
/// Returns `None` when nothing usable remains.
pub fn derive_username(display_name: &str) -> Option<String> {
  let username: String = display_name
    .split_whitespace()
    .collect::<String>()
    .to_lowercase();
  (!username.is_empty()).then_some(username)
}

/// The `user<6 hex>` username used when none can be derived.
pub fn fallback_username() -> String { format!("user{}", crate::id::short_hex()) }

#[cfg(test)]
mod tests {
  use super::*;

  fn identity() -> VerifiedIdentity {
    VerifiedIdentity::new("sub-1", "ada@example.com", "Ada Lovelace", "https://img/ada.png")
  }

  #[test]
  fn derive_username_collapses_whitespace() {
    assert_eq!(derive_username("Ada  Lovelace").as_deref(), Some("adalovelace"));
    assert_eq!(derive_username("\tGrace\nHopper ").as_deref(), Some("gracehopper"));
    assert_eq!(derive_username("   "), None);
    assert_eq!(derive_username(""), None);
  }

  #[test]
  fn fallback_username_shape() {
    let u = fallback_username();
    assert!(u.starts_with("user"));
    assert_eq!(u.len(), 10);
  }

  #[test]
  fn new_creator_gets_defaults_from_identity() {
    let c = Creator::from_identity(identity(), "adalovelace".into());
    assert!(c.id.as_str().starts_with("CR-"));
    assert_eq!(c.name, "Ada Lovelace");
    assert_eq!(c.avatar, "https://img/ada.png");
    assert_eq!(c.expertise, DEFAULT_EXPERTISE);
    assert_eq!(c.bio, DEFAULT_BIO);
    assert_eq!(c.identity.subject, "sub-1");
  }

  #[test]
  fn snapshot_is_detached_from_later_updates() {
    let mut c = Creator::from_identity(identity(), "ada".into());
    let snap = c.snapshot();
    c.name = "Grace".into();
    assert_eq!(snap.name, "Ada Lovelace");
    assert_eq!(snap.id, c.id);
  }
}
