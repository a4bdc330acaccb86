//! Configuration and Diesel row models.

pub mod config;
#[cfg(feature = "sqlite")]
pub mod category;
