//! # streamkit
//!
//! Keyed, insertion-ordered registries of uniquely identified objects, plus
//! the atomic settings persistence that backs the StreamKit viewer economy.
//!
//! Three registry flavours share one interface:
//!
//! - [`LockRegistry`]: a reader-writer locked registry whose lock acquisition
//!   is bounded by a [`LockTimeout`]. Contended operations surface as
//!   [`Error::Contended`] through the `try_*` methods and degrade to an empty
//!   or `false` result through the plain ones.
//! - [`SnapshotRegistry`]: a lock-free, copy-on-write registry. Readers never
//!   wait and writers publish whole snapshots.
//! - [`FrozenRegistry`]: an immutable registry built once at startup.
//!
//! Registries are plain values. Construct them explicitly and hand them to the
//! subsystems that need them; [`RegistrationList`] replaces runtime discovery
//! with an explicit list of providers.
//!
//! ```
//! use std::sync::Arc;
//! use streamkit::{LockRegistry, Platform, ReadOnlyRegistry, Registry};
//!
//! let registry = LockRegistry::new();
//! assert!(registry.register(Arc::new(Platform::new("a", "Alpha"))));
//! assert!(registry.register(Arc::new(Platform::new("b", "Beta"))));
//! assert!(!registry.register(Arc::new(Platform::new("a", "Other"))));
//!
//! assert_eq!(registry.get("a").map(|p| p.name.clone()), Some("Alpha".into()));
//! assert!(registry.unregister_id("a"));
//! assert!(registry.get("a").is_none());
//! assert_eq!(registry.all_registrants().len(), 1);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod identity;
mod platform;
mod registry;
#[cfg(feature = "serde")]
mod store;

pub use crate::error::*;
pub use crate::identity::*;
pub use crate::platform::*;
pub use crate::registry::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::store::*;
