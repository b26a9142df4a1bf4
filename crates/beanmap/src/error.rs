// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.

use crate::types::Type;
use std::sync::Arc;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Property access failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("property '{0}' is not readable")]
    NotReadable(Arc<str>),

    #[error("property '{0}' is not writeable")]
    NotWriteable(Arc<str>),

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("missing required property '{0}'")]
    MissingProperty(String),

    #[error("null value for non-optional {0}")]
    NullValue(String),
}

impl AccessError {
    pub(crate) fn mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// Mapping engine errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A type could not be described structurally.
    #[error("cannot resolve {ty}: {reason}")]
    Resolving { ty: Type, reason: String },

    /// No conversion handler produced a value for this type pair.
    #[error("no conversion from {from} to {to}")]
    Conversion { from: Type, to: Type },

    /// A single property failed while copying between two objects.
    #[error("copy from {from} to {to} failed on property '{property}': {source}")]
    Copy {
        from: Type,
        to: Type,
        property: String,
        source: Box<Error>,
    },

    #[error(transparent)]
    Access(#[from] AccessError),

    /// Nesting went deeper than `ConversionOptions::max_depth`.
    #[error("maximum mapping depth {limit} exceeded")]
    DepthExceeded { limit: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// True if this error (or the error it wraps) is a depth overflow.
    pub fn is_depth_exceeded(&self) -> bool {
        match self {
            Self::DepthExceeded { .. } => true,
            Self::Copy { source, .. } => source.is_depth_exceeded(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Conversion {
            from: Type::String,
            to: Type::I32,
        };
        assert_eq!(err.to_string(), "no conversion from String to i32");

        let copy = Error::Copy {
            from: Type::Any,
            to: Type::map(Type::String, Type::Any),
            property: "age".into(),
            source: Box::new(err),
        };
        assert!(copy.to_string().contains("property 'age'"));
        assert!(std::error::Error::source(&copy).is_some());
    }

    #[test]
    fn test_depth_exceeded_is_seen_through_copy() {
        let nested = Error::Copy {
            from: Type::Any,
            to: Type::Any,
            property: "next".into(),
            source: Box::new(Error::DepthExceeded { limit: 4 }),
        };
        assert!(nested.is_depth_exceeded());
        assert!(!Error::Config("x".into()).is_depth_exceeded());
    }
}
