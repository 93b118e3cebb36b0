use thiserror::Error;

/// Failure to turn a credential into a verified Google identity.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("identity provider request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{endpoint} endpoint returned HTTP {status}")]
  Status { endpoint: &'static str, status: u16 },

  #[error("token response carried no id_token")]
  MissingIdToken,

  #[error("token audience {0:?} does not match the configured client id")]
  Audience(String),

  #[error("unexpected token issuer {0:?}")]
  Issuer(String),

  #[error("token carries no subject")]
  MissingSubject,
}
