use core::fmt;

use thiserror::Error;

/// A result type defaulting to the registry [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The registry operation that was being attempted when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Inserting a registrant.
    Register,
    /// Removing a registrant, by reference or by id.
    Unregister,
    /// Looking up a registrant by id.
    Get,
    /// Copying out every registrant.
    Snapshot,
}

impl fmt::Display for Operation {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Register => "register",
            Self::Unregister => "unregister",
            Self::Get => "get",
            Self::Snapshot => "snapshot",
        };
        fmt.write_str(name)
    }
}

/// All errors the registries can produce.
///
/// Normal registry operations never fail outright: a duplicate id or a missing
/// entry is reported through the `Ok` value. The only runtime failure is
/// [`Error::Contended`], raised when a bounded lock wait expires. The other
/// variants come from building a registry out of a fixed list of registrants.
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The registry lock could not be acquired within the configured timeout.
    ///
    /// The operation did not take effect. Callers of the infallible forms see
    /// this as an empty, `None`, or `false` result.
    #[error("registry lock contended during {op}")]
    Contended {
        /// The operation that was dropped.
        op: Operation,
    },

    /// Two registrants in a construction list share the same id.
    #[error("an entry with the id '{id}' is already registered")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// A frozen registry was built from an empty list.
    #[error("registry cannot be empty")]
    EmptyRegistry,
}

impl Error {
    /// Returns `true` if the error only reflects lock contention.
    pub const fn is_contended(&self) -> bool {
        matches!(self, Self::Contended { .. })
    }
}
