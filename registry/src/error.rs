//! Registration errors.

use std::fmt;

use wire::MessageCode;

use crate::BuildRange;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while building a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The same code was registered twice over an identical build range.
    DuplicateRange {
        code: MessageCode,
        range: BuildRange,
    },

    /// The range's lower bound lies above its upper bound.
    InvalidRange {
        code: MessageCode,
        range: BuildRange,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRange { code, range } => {
                write!(f, "code {code} is already registered for builds {range}")
            }
            Self::InvalidRange { code, range } => {
                write!(f, "code {code} registered with empty build range {range}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
