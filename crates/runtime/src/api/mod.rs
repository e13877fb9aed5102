//! Public runtime API surface.
//!
//! This module gathers the types exposed to request handlers so the
//! coordinator can stay focused on orchestration.

pub mod errors;
pub mod types;

pub use errors::{PartialFailure, ResolutionError, Result};
pub use types::{
    BattleResolution, CaptureOutcome, CaptureReport, CaptureRequest, SpentConsumables,
};
