//! Atomic load/save of settings documents.
//!
//! A [`PersistableFile`] pairs a [`DataSerializer`] with per-path bookkeeping:
//! once a file fails to load, further saves to it are blocked so a corrupt or
//! unreadable document is never silently replaced with defaults.

mod error;
mod file;
mod serializer;
#[cfg(test)]
mod tests;

pub use error::*;
pub use file::*;
pub use serializer::*;
