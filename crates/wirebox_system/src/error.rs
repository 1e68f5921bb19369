//! Errors surfaced by the container.
//!
//! Every failure is synchronous and reported to the immediate caller. Wiring
//! mistakes (missing or duplicate mappings) are programming errors, so the
//! container never retries or falls back silently.

use crate::actor::{BoxError, InjectError};

/// Errors that can occur while mapping, resolving or notifying.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// No mapping exists for the requested key.
    #[error("no mapping found for key '{0}'")]
    MissingMapping(String),

    /// The key is already mapped. Unmap it first, or use `remap`.
    #[error("key '{0}' is already mapped; unmap it first or use remap")]
    DuplicateMapping(String),

    /// The exact (event, receiver, handler) triple is already mapped.
    #[error("handler '{handler}' on '{receiver}' is already mapped to event '{event}'")]
    DuplicateHandler {
        /// The event name.
        event: String,
        /// The receiver description.
        receiver: String,
        /// The handler description.
        handler: String,
    },

    /// A unique plugin was added twice.
    #[error("plugin '{0}' is unique and was already added")]
    DuplicatePlugin(String),

    /// A required argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The resolved instance is not of the requested concrete type.
    #[error("instance for key '{key}' is a {actual}, not a {expected}")]
    DowncastFailed {
        /// The key that was resolved.
        key: String,
        /// The requested type.
        expected: &'static str,
        /// The type actually stored.
        actual: &'static str,
    },

    /// An outlet rejected the value resolved for it.
    #[error("failed to inject '{source_key}' into outlet '{property}' of '{target}'")]
    Injection {
        /// Key of the instance being injected.
        target: String,
        /// The outlet property.
        property: String,
        /// Key of the injected dependency.
        source_key: String,
        /// Why the outlet rejected the value.
        #[source]
        source: InjectError,
    },

    /// The post-injection hook returned an error.
    #[error("post-injection hook '{hook}' failed for '{key}'")]
    HookFailed {
        /// Key of the instance being set up.
        key: String,
        /// The configured hook name.
        hook: String,
        /// The hook's error.
        #[source]
        source: BoxError,
    },

    /// A method handler names a method the receiver does not respond to.
    #[error("receiver '{key}' has no method '{method}' for event '{event}'")]
    UnknownMethod {
        /// The event being dispatched.
        event: String,
        /// The receiver key.
        key: String,
        /// The missing method.
        method: String,
    },

    /// A handler mapping points at a key that has since been unmapped.
    #[error("event '{event}' is mapped to receiver '{key}', which has no mapping")]
    MissingReceiver {
        /// The event being dispatched.
        event: String,
        /// The unmapped receiver key.
        key: String,
    },

    /// A handler or callback returned an error.
    #[error("handler for event '{event}' failed")]
    HandlerFailed {
        /// The event being dispatched.
        event: String,
        /// The handler's error.
        #[source]
        source: BoxError,
    },
}

/// Rejects empty identifiers.
pub(crate) fn require_non_empty(value: &str, what: &'static str) -> Result<(), SystemError> {
    if value.is_empty() {
        return Err(SystemError::InvalidArgument(what));
    }
    Ok(())
}
