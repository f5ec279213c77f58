//! Error handling for evictor
//!
//! The eviction engine itself never fails; these errors come from building
//! and loading configuration.

mod display;
mod recovery;
mod types;

pub use types::*;
