//! Stackr server: configuration, the Google identity provider and the daily
//! rating scheduler. The binary in `main.rs` wires them to the API router.

pub mod error;
pub mod identity;
pub mod scheduler;

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

pub use error::IdentityError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STACKR_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  #[serde(default = "default_store_path")]
  pub store_path:              PathBuf,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs:    u64,
  #[serde(default = "default_store_busy_timeout_ms")]
  pub store_busy_timeout_ms:   u64,
  #[serde(default)]
  pub google_client_id:        String,
  #[serde(default)]
  pub google_client_secret:    String,
  #[serde(default)]
  pub google_redirect_uri:     String,
  #[serde(default = "default_identity_timeout_secs")]
  pub identity_timeout_secs:   u64,
  #[serde(default = "default_true")]
  pub rating_schedule_enabled: bool,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/stackr/stackr.db") }
fn default_request_timeout_secs() -> u64 { 30 }
fn default_store_busy_timeout_ms() -> u64 { 5000 }
fn default_identity_timeout_secs() -> u64 { 10 }
fn default_true() -> bool { true }

impl ServerConfig {
  /// Environment variable prefix, e.g. `STACKR_PORT=8080`.
  pub const ENV_PREFIX: &'static str = "STACKR";

  /// Layer `STACKR_*` environment variables over the optional TOML file at
  /// `path`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(Self::ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~/` expanded to `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    expand_home(&self.store_path, std::env::var("HOME").ok().as_deref())
  }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  pub fn store_busy_timeout(&self) -> Duration {
    Duration::from_millis(self.store_busy_timeout_ms)
  }

  pub fn identity_timeout(&self) -> Duration { Duration::from_secs(self.identity_timeout_secs) }

  pub fn google(&self) -> identity::GoogleConfig {
    identity::GoogleConfig {
      client_id:     self.google_client_id.clone(),
      client_secret: self.google_client_secret.clone(),
      redirect_uri:  self.google_redirect_uri.clone(),
    }
  }
}

fn expand_home(path: &Path, home: Option<&str>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => Path::new(home).join(rest),
    _ => path.to_path_buf(),
  }
}
