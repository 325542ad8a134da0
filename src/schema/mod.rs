//! Schema module - Configuration and resource types for recipe evolution.

mod config;
mod emotion;
mod evolution;
mod lexicon;

pub use config::*;
pub use emotion::*;
pub use evolution::*;
pub use lexicon::*;
