#![forbid(unsafe_code)]

//! Error taxonomy for binding operations.
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Invalid argument | Empty property name, read-only target, self-binding | `Err(InvalidArgument)`, nothing registered |
//! | Conflict | Identical combination already bound | `Err(Conflict)`, first binding untouched |
//! | No match on unbind | Nothing registered for the selector | `Ok`-style count of 0, never an error |

use std::fmt;

use crate::key::ContextId;

/// Which registry a binding lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Property value synchronization.
    Property,
    /// Property-changed trigger.
    PropertyChanged,
    /// Property-changing trigger.
    PropertyChanging,
    /// Collection-changed trigger.
    CollectionChanged,
    /// Per-item property trigger maintained across collection changes.
    ItemPropertyChanged,
    /// Command routed from an executor.
    Command,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => write!(f, "property"),
            Self::PropertyChanged => write!(f, "property-changed"),
            Self::PropertyChanging => write!(f, "property-changing"),
            Self::CollectionChanged => write!(f, "collection-changed"),
            Self::ItemPropertyChanged => write!(f, "item-property-changed"),
            Self::Command => write!(f, "command"),
        }
    }
}

/// Errors from bind operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A required argument was missing or unusable.
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// The same combination is already bound under this context.
    Conflict {
        /// Registry that rejected the binding.
        kind: BindingKind,
        /// Context of the existing binding.
        context: ContextId,
    },
}

impl BindError {
    pub(crate) const fn invalid(parameter: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { parameter, reason }
    }

    pub(crate) const fn conflict(kind: BindingKind, context: ContextId) -> Self {
        Self::Conflict { kind, context }
    }

    /// Whether this error reports an already-registered combination.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { parameter, reason } => {
                write!(f, "invalid argument `{parameter}`: {reason}")
            }
            Self::Conflict { kind, context } => {
                write!(f, "{kind} binding already registered for {context}")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Result alias for bind operations.
pub type BindResult<T> = Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_argument() {
        let e = BindError::invalid("target_property", "property is read-only");
        assert_eq!(
            e.to_string(),
            "invalid argument `target_property`: property is read-only"
        );
        assert!(!e.is_conflict());
    }

    #[test]
    fn display_conflict() {
        let ctx = ContextId::from_raw(7);
        let e = BindError::conflict(BindingKind::Command, ctx);
        assert_eq!(
            e.to_string(),
            format!("command binding already registered for {ctx}")
        );
        assert!(e.is_conflict());
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&BindError::invalid("x", "y"));
    }
}
