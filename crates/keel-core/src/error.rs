use std::fmt;

use thiserror::Error;

use crate::convention::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("unsupported region: {region:?} has no entry in the region code table")]
    InvalidRegion { region: String },

    #[error("{kind} name {name:?} violates naming constraints: {violation}")]
    NameConstraintViolation {
        kind: ResourceKind,
        name: String,
        violation: NameViolation,
    },
}

/// Why a composed name was rejected. Names are never truncated to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolation {
    TooLong { len: usize, max: usize },
    InvalidCharset { character: char },
    /// Leading, trailing or doubled separator, or a non-letter first character.
    MalformedSeparator,
}

impl fmt::Display for NameViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooLong { len, max } => write!(f, "{len} characters exceeds the limit of {max}"),
            Self::InvalidCharset { character } => {
                write!(f, "character {character:?} is not allowed")
            }
            Self::MalformedSeparator => {
                write!(f, "must start with a letter and use single inner hyphens")
            }
        }
    }
}
