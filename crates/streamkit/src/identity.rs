use std::{rc::Rc, sync::Arc};

/// An object with a unique, stable string id and a display name.
///
/// The id is the registry key; the name is only for display. Owned, shared,
/// and borrowed forms all forward to the underlying value, so an
/// `Arc<dyn Identifiable>` can be registered just like a concrete type.
///
/// # Example
///
/// ```
/// use streamkit::Identifiable;
///
/// struct Viewer {
///     login: String,
/// }
///
/// impl Identifiable for Viewer {
///     fn id(&self) -> &str {
///         &self.login
///     }
/// }
///
/// let viewer = Viewer { login: "sirrandoo".into() };
/// assert_eq!(viewer.id(), "sirrandoo");
/// assert_eq!(viewer.name(), "sirrandoo");
/// ```
pub trait Identifiable {
    /// The unique id this object is registered under.
    fn id(&self) -> &str;

    /// A human-readable name. Defaults to the id.
    fn name(&self) -> &str {
        self.id()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Rc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
