//! Category catalog for a video platform.
//!
//! The crate holds the `Category` aggregate, the repository and unit-of-work
//! contracts with a SQLite adapter and an in-memory one, and the use cases
//! that create, read, update, delete and list categories.

#[cfg(feature = "sqlite")]
pub mod db;
pub mod domain;
pub mod dto;
mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "sqlite")]
pub mod schema;
pub mod services;
