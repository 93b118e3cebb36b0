//! Core types, trait definitions and services for the Stackr catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::CatalogStore`]; identity providers
//! implement [`identity::IdentityProvider`]. The services in [`directory`],
//! [`registry`], [`catalog`] and [`reviews`] hold all domain rules and are
//! generic over both.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod creator;
pub mod directory;
pub mod error;
pub mod id;
pub mod identity;
pub mod page;
pub mod registry;
pub mod reviews;
pub mod stack;
pub mod store;
pub mod technology;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
