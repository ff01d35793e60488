//! # Posts Core
//!
//! The domain layer of the blog posts service.
//! This crate holds the post entity, the error taxonomy and the ports that
//! storage backends implement. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{RepoError, StoreError};
