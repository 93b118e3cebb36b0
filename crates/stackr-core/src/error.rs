//! Error types for `stackr-core`.
//!
//! Every service operation fails with one of the variants below. Backend
//! errors (store, identity provider) are boxed as the `source` of
//! [`Error::StoreUnavailable`], [`Error::RegistryWriteFailed`] or
//! [`Error::VerificationFailed`]; they never escape as their own type.

use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  #[error("creator not found: {0}")]
  CreatorNotFound(String),

  #[error("stack not found: {0}")]
  StackNotFound(String),

  #[error("email {email} is already claimed by another account")]
  DuplicateIdentity { email: String },

  #[error("validation failed: {0}")]
  ValidationFailed(String),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] BoxError),

  #[error("failed to write technologies: {0}")]
  RegistryWriteFailed(#[source] BoxError),

  #[error("identity verification failed: {0}")]
  VerificationFailed(#[source] BoxError),
}

/// The stable, wire-independent classification of an [`Error`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  strum::Display,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  CreatorNotFound,
  StackNotFound,
  DuplicateIdentity,
  ValidationFailed,
  StoreUnavailable,
  RegistryWriteFailed,
  VerificationFailed,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::CreatorNotFound(_) => ErrorKind::CreatorNotFound,
      Self::StackNotFound(_) => ErrorKind::StackNotFound,
      Self::DuplicateIdentity { .. } => ErrorKind::DuplicateIdentity,
      Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
      Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
      Self::RegistryWriteFailed(_) => ErrorKind::RegistryWriteFailed,
      Self::VerificationFailed(_) => ErrorKind::VerificationFailed,
    }
  }

  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(e))
  }

  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::ValidationFailed(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
