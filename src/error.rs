//! Error types for the Modwire resolver.
//!
//! This module provides a unified error type [`ModwireError`] that covers
//! all error conditions that can occur during descriptor decoding, module
//! construction, link resolution, and repository discovery.
//!
//! Constraint grammar failures have their own [`GrammarError`] type, which
//! is wrapped with pin and parameter context once it crosses into module
//! construction.

use thiserror::Error;

use crate::graph::Direction;

/// Result type alias using [`ModwireError`].
pub type Result<T> = std::result::Result<T, ModwireError>;

/// Errors from the value-constraint mini-language.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// A constraint marker with nothing after it (`=` or `~`)
    #[error("empty constraint token '{token}'")]
    EmptyConstraint { token: String },

    /// More than one marker on a single token (`=~x`, `~=x`, `==x`)
    #[error("constraint token '{token}' combines more than one marker")]
    MixedMarkers { token: String },

    /// One side of a `low..high` range is missing
    #[error("range '{token}' has an empty boundary")]
    EmptyRangeBound { token: String },

    /// A range boundary that is not a number
    #[error("range '{token}' has a non-numeric boundary '{bound}'")]
    InvalidRangeBound { token: String, bound: String },

    /// A range whose low boundary is above its high boundary
    #[error("range '{token}' has its low boundary above its high boundary")]
    InvertedRange { token: String },

    /// A value that cannot be flattened into tokens (nested map, etc.)
    #[error("unsupported value shape: {message}")]
    UnsupportedValue { message: String },
}

/// Unified error type for all Modwire operations.
#[derive(Error, Debug)]
pub enum ModwireError {
    // ============ Descriptor Errors ============
    /// Structured text could not be decoded
    #[error("Failed to decode descriptor '{path}': {source}")]
    DescriptorDecode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Descriptor tree has the wrong shape at some position
    #[error("Invalid descriptor at '{path}': {message}")]
    InvalidDescriptor { path: String, message: String },

    /// Descriptor nesting exceeds the configured recursion limit
    #[error("Descriptor nesting at '{path}' exceeds the depth limit of {limit}")]
    DepthLimitExceeded { path: String, limit: usize },

    // ============ Construction Errors ============
    /// A pin parameter failed the constraint grammar
    #[error("Invalid parameter '{param}' on pin '{pin}' in '{module}': {source}")]
    InvalidParameter {
        module: String,
        pin: String,
        param: String,
        #[source]
        source: GrammarError,
    },

    /// A module constraints block failed the constraint grammar
    #[error("Invalid constraint '{type_name}.{param}' in '{module}': {source}")]
    InvalidConstraint {
        module: String,
        type_name: String,
        param: String,
        #[source]
        source: GrammarError,
    },

    /// A pin descriptor without any usable name
    #[error("Pin declared in '{module}' has no name")]
    MissingPinName { module: String },

    /// A pin whose type can be neither read nor derived from its name
    #[error("Pin '{pin}' in '{module}' has no derivable type")]
    MissingPinType { module: String, pin: String },

    /// Two pins with the same name in the same take/give map
    #[error("Duplicate {direction} pin '{pin}' in '{module}'")]
    DuplicatePin {
        module: String,
        pin: String,
        direction: Direction,
    },

    // ============ Link Resolution Errors (recoverable) ============
    /// An explicit link names a pin absent from the expected map
    #[error("Link target '{target}' requested by '{source_pin}' is not a {expected} pin of '{module}'")]
    UnresolvedLink {
        module: String,
        source_pin: String,
        target: String,
        expected: Direction,
    },

    /// An explicit link would re-pair a pin that already has a partner
    #[error("Pin '{pin}' in '{module}' is already linked to '{existing}', ignoring link to '{requested}'")]
    AlreadyLinked {
        module: String,
        pin: String,
        existing: String,
        requested: String,
    },

    /// A scoped pin collides with an existing pin in an ancestor
    #[error("Scoped {direction} pin '{pin}' collides with an existing pin in '{module}'")]
    ScopeConflict {
        module: String,
        pin: String,
        direction: Direction,
    },

    // ============ I/O Errors ============
    /// Error reading a descriptor file
    #[error("Failed to read descriptor file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error walking a repository tree
    #[cfg(feature = "cli")]
    #[error("Failed to scan repository '{root}': {source}")]
    WalkError {
        root: String,
        #[source]
        source: walkdir::Error,
    },
}

impl ModwireError {
    /// Create an invalid descriptor error
    pub fn invalid_descriptor(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved link error
    pub fn unresolved_link(
        module: impl Into<String>,
        source_pin: impl Into<String>,
        target: impl Into<String>,
        expected: Direction,
    ) -> Self {
        Self::UnresolvedLink {
            module: module.into(),
            source_pin: source_pin.into(),
            target: target.into(),
            expected,
        }
    }

    /// Whether the build continues past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedLink { .. } | Self::AlreadyLinked { .. } | Self::ScopeConflict { .. }
        )
    }
}
