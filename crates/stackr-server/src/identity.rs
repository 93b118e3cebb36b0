//! Google OAuth identity provider.
//!
//! A sign-in credential is the authorization code returned to the client by
//! Google's consent screen. [`GoogleIdentity`] exchanges it for tokens at the
//! token endpoint, then has Google validate the ID token at `tokeninfo` and
//! checks the audience and issuer itself before trusting any claim.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use stackr_core::identity::{IdentityProvider, VerifiedIdentity};

use crate::error::IdentityError;

pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Issuers Google signs ID tokens with.
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
  pub client_id:     String,
  pub client_secret: String,
  pub redirect_uri:  String,
}

/// Verifies Google authorization codes. Clones share one connection pool.
#[derive(Clone)]
pub struct GoogleIdentity {
  client: Client,
  config: GoogleConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
  id_token: Option<String>,
}

/// Claims returned by the `tokeninfo` endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
  #[serde(default)]
  pub aud:     String,
  #[serde(default)]
  pub iss:     String,
  #[serde(default)]
  pub sub:     String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub picture: String,
  #[serde(flatten)]
  pub extra:   Map<String, Value>,
}

impl GoogleIdentity {
  pub fn new(config: GoogleConfig, timeout: Duration) -> Result<Self, IdentityError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, config })
  }

  /// `POST /token` with `grant_type=authorization_code`.
  async fn exchange_code(&self, code: &str) -> Result<String, IdentityError> {
    let resp = self
      .client
      .post(TOKEN_ENDPOINT)
      .form(&[
        ("code", code),
        ("client_id", self.config.client_id.as_str()),
        ("client_secret", self.config.client_secret.as_str()),
        ("redirect_uri", self.config.redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
      ])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(IdentityError::Status { endpoint: "token", status: resp.status().as_u16() });
    }
    let tokens: TokenResponse = resp.json().await?;
    tokens.id_token.ok_or(IdentityError::MissingIdToken)
  }

  /// `GET /tokeninfo?id_token=<jwt>`
  async fn token_info(&self, id_token: &str) -> Result<TokenInfo, IdentityError> {
    let resp = self
      .client
      .get(TOKENINFO_ENDPOINT)
      .query(&[("id_token", id_token)])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(IdentityError::Status { endpoint: "tokeninfo", status: resp.status().as_u16() });
    }
    Ok(resp.json().await?)
  }
}

impl IdentityProvider for GoogleIdentity {
  type Error = IdentityError;

  fn verify(
    &self,
    credential: String,
  ) -> impl Future<Output = Result<VerifiedIdentity, IdentityError>> + Send + '_ {
    async move {
      let id_token = self.exchange_code(&credential).await?;
      let info = self.token_info(&id_token).await?;
      check_claims(info, &self.config.client_id)
    }
  }
}

/// Accept `info` only if it was issued by Google for `client_id`.
///
/// `aud`, `iss` and every claim without a dedicated field are kept in
/// [`VerifiedIdentity::extra`].
pub fn check_claims(info: TokenInfo, client_id: &str) -> Result<VerifiedIdentity, IdentityError> {
  let TokenInfo { aud, iss, sub, email, name, picture, mut extra } = info;

  if aud != client_id {
    return Err(IdentityError::Audience(aud));
  }
  if !ISSUERS.contains(&iss.as_str()) {
    return Err(IdentityError::Issuer(iss));
  }
  if sub.is_empty() {
    return Err(IdentityError::MissingSubject);
  }

  extra.insert("aud".into(), Value::String(aud));
  extra.insert("iss".into(), Value::String(iss));
  Ok(VerifiedIdentity { subject: sub, email, name, picture, extra })
}
