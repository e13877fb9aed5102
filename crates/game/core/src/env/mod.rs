//! Capabilities and static data the rules depend on.
//!
//! Randomness is a capability handed to every roll rather than a hidden
//! global, and the item catalog is read-only content supplied by the caller.
//! Neither is owned by encounter state.
mod items;
mod rng;

pub use items::{CatalogItem, ItemId};
pub use rng::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
