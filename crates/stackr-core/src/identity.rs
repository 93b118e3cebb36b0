//! The identity-provider seam.
//!
//! An [`IdentityProvider`] turns an opaque credential (an OAuth authorization
//! code, an ID token, ...) into a [`VerifiedIdentity`]. The concrete provider
//! lives outside this crate.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// The verified claims returned by the identity provider.
///
/// Stored verbatim on the [`Creator`](crate::creator::Creator) it resolved
/// to; `subject` is the key used to recognise the same person on later
/// logins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
  /// The provider's stable subject claim (`sub`).
  pub subject: String,
  pub email:   String,
  /// Display name.
  pub name:    String,
  /// Avatar URL.
  pub picture: String,
  /// Any further claims the provider returned.
  #[serde(flatten)]
  pub extra:   serde_json::Map<String, serde_json::Value>,
}

impl VerifiedIdentity {
  /// Identity with no extra claims.
  pub fn new(
    subject: impl Into<String>,
    email: impl Into<String>,
    name: impl Into<String>,
    picture: impl Into<String>,
  ) -> Self {
    Self {
      subject: subject.into(),
      email:   email.into(),
      name:    name.into(),
      picture: picture.into(),
      extra:   serde_json::Map::new(),
    }
  }
}

/// Verifies opaque credentials against an external identity provider.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Verify `credential`, returning the identity it proves.
  fn verify(
    &self,
    credential: String,
  ) -> impl Future<Output = Result<VerifiedIdentity, Self::Error>> + Send + '_;
}
