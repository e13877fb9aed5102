//! Runtime wrappers around static encounter content.
//!
//! Content is immutable at runtime; dynamic state lives in repositories.
mod items;

pub use items::{ItemOracle, ItemOracleImpl};
