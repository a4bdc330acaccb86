//! Category aggregate and the value types it is built from.

pub mod category;
pub mod clock;
pub mod types;
pub mod validation;
