//! Error type shared by configuration, layout construction and event building.
//!
//! Rendering itself is infallible; errors surface when a layout is built from
//! bad configuration or when an event is assembled without required attributes.

use thiserror::Error;

/// Errors produced while configuring layouts or assembling events.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured sensitive field name cannot be matched as a JSON key.
    #[error("invalid sensitive field name {name:?}: {reason}")]
    InvalidFieldName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A pattern layout format string could not be parsed.
    #[error("invalid layout pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// What went wrong while parsing it.
        reason: String,
    },

    /// The layout type is not present in the registry.
    #[error("unknown layout type {0:?}")]
    UnknownLayout(String),

    /// A log event was assembled without a required attribute.
    #[error("malformed log event: missing {field}")]
    MalformedEvent {
        /// Name of the missing attribute.
        field: &'static str,
    },

    /// Configuration could not be deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Writing a rendered line failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
