use std::sync::Arc;

use crate::{Identifiable, RegistrationList};

/// A streaming platform viewers can connect from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Platform {
    /// Stable, lowercase id such as `twitch`.
    pub id: String,
    /// Display name such as `Twitch`.
    pub name: String,
}

impl Platform {
    /// Creates a platform from its id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for Platform {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The platforms StreamKit knows about out of the box.
pub fn builtin_platforms() -> Vec<Arc<Platform>> {
    vec![
        Arc::new(Platform::new("twitch", "Twitch")),
        Arc::new(Platform::new("trovo", "Trovo")),
        Arc::new(Platform::new("youtube", "YouTube")),
        Arc::new(Platform::new("kick", "Kick")),
    ]
}

/// The default startup registration list for platforms.
pub fn platform_registrations() -> RegistrationList<Platform> {
    RegistrationList::new().with("builtin", builtin_platforms)
}

/// The on-disk platform catalog document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatformCatalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub platforms: Vec<Platform>,
}

impl PlatformCatalog {
    /// A catalog holding [`builtin_platforms`].
    pub fn builtin() -> Self {
        Self {
            platforms: builtin_platforms()
                .into_iter()
                .map(Arc::unwrap_or_clone)
                .collect(),
        }
    }

    /// Converts the catalog into shareable registrants, preserving order.
    pub fn into_registrants(self) -> Vec<Arc<Platform>> {
        self.platforms.into_iter().map(Arc::new).collect()
    }
}
