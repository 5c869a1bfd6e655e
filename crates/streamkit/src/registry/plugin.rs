use std::sync::Arc;

use crate::{Identifiable, Registry, Result};

/// A function that hands over a module's registrants at startup.
pub type Provider<T> = fn() -> Vec<Arc<T>>;

/// An explicit, ordered list of registrant providers.
///
/// Each module that contributes registrants exposes a [`Provider`] and is
/// named here once, at startup. Installing the list registers every
/// provider's registrants in order, so earlier providers win id conflicts.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use streamkit::{LockRegistry, Platform, ReadOnlyRegistry, RegistrationList, builtin_platforms};
///
/// fn community() -> Vec<Arc<Platform>> {
///     vec![Arc::new(Platform::new("owncast", "Owncast"))]
/// }
///
/// let list = RegistrationList::new()
///     .with("builtin", builtin_platforms)
///     .with("community", community);
///
/// let registry = LockRegistry::new();
/// let report = list.install(&registry);
/// assert_eq!(report.registered, 5);
/// assert!(registry.contains("owncast"));
/// ```
pub struct RegistrationList<T: ?Sized> {
    providers: Vec<(&'static str, Provider<T>)>,
}

impl<T: Identifiable + ?Sized> RegistrationList<T> {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Appends a named provider, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, provider: Provider<T>) -> Self {
        self.push(name, provider);
        self
    }

    /// Appends a named provider.
    pub fn push(&mut self, name: &'static str, provider: Provider<T>) {
        self.providers.push((name, provider));
    }

    /// The names of the providers, in installation order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.iter().map(|(name, _)| *name)
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no provider was added.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Calls every provider and concatenates their registrants in order.
    ///
    /// Useful for building a [`FrozenRegistry`](crate::FrozenRegistry).
    pub fn collect(&self) -> Vec<Arc<T>> {
        self.providers
            .iter()
            .flat_map(|(_, provider)| provider())
            .collect()
    }

    /// Registers every provider's registrants into `registry`.
    pub fn install<R>(&self, registry: &R) -> InstallReport
    where
        R: Registry<T> + ?Sized,
    {
        let mut report = InstallReport::default();
        for (_name, provider) in &self.providers {
            for item in provider() {
                let id = item.id().to_owned();
                let outcome = registry.try_register(item);
                #[cfg(feature = "tracing")]
                if !matches!(outcome, Ok(true)) {
                    tracing::warn!(
                        provider = *_name,
                        id = %id,
                        ?outcome,
                        "registrant not installed"
                    );
                }
                report.record(id, outcome);
            }
        }
        report
    }
}

impl<T: Identifiable + ?Sized> Default for RegistrationList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to each registrant during a bulk registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// How many registrants were inserted.
    pub registered: usize,
    /// Ids rejected because they were already taken.
    pub duplicates: Vec<String>,
    /// Ids dropped because the registry was contended.
    pub dropped: Vec<String>,
}

impl InstallReport {
    /// Tallies the outcome of one `try_register` call.
    pub fn record(&mut self, id: String, outcome: Result<bool>) {
        match outcome {
            Ok(true) => self.registered += 1,
            Ok(false) => self.duplicates.push(id),
            // Registration reports nothing but contention.
            Err(_) => self.dropped.push(id),
        }
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: InstallReport) {
        self.registered += other.registered;
        self.duplicates.extend(other.duplicates);
        self.dropped.extend(other.dropped);
    }

    /// Returns `true` if every registrant was inserted.
    pub fn is_complete(&self) -> bool {
        self.duplicates.is_empty() && self.dropped.is_empty()
    }
}
