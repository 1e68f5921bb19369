//! Container configuration.
//!
//! [`SystemConfig`] holds the knobs that change how instances are produced
//! and how dispatch treats stale handler mappings. Build one with the
//! `with_*` methods and pass it to
//! [`System::with_config`](crate::system::System::with_config), or adjust a
//! live container with [`System::configure`](crate::system::System::configure).
//!
//! ```
//! use wirebox_system::config::{MissingReceiver, SystemConfig};
//!
//! let config = SystemConfig::default()
//!     .with_strict_injections(false)
//!     .with_post_injection_hook("init")
//!     .with_missing_receiver(MissingReceiver::Skip);
//!
//! assert!(!config.strict_injections);
//! assert_eq!(config.post_injection_hook, "init");
//! ```

/// Default name of the post-injection hook.
pub const DEFAULT_POST_INJECTION_HOOK: &str = "setup";

/// What `notify` does when a handler's receiver key is no longer mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingReceiver {
    /// Abort dispatch with
    /// [`SystemError::MissingReceiver`](crate::error::SystemError::MissingReceiver).
    #[default]
    Error,
    /// Skip the handler, log a warning and continue.
    Skip,
}

/// Configuration for a [`System`](crate::system::System).
///
/// # Fields
///
/// - `strict_injections` - only inject into properties the actor declares
/// - `post_injection_hook` - hook run after outlets are applied
/// - `auto_map_outlets` - every mapping also registers a global outlet
///   whose property equals the key
/// - `missing_receiver` - policy for handler mappings whose key is gone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    /// Apply outlets only to declared properties. Defaults to `true`.
    pub strict_injections: bool,
    /// Name passed to [`Actor::hook`](crate::actor::Actor::hook) after
    /// injection. Defaults to `"setup"`.
    pub post_injection_hook: String,
    /// Register a global outlet for every new mapping. Defaults to `false`.
    pub auto_map_outlets: bool,
    /// Policy for stale handler receivers. Defaults to
    /// [`MissingReceiver::Error`].
    pub missing_receiver: MissingReceiver,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            strict_injections: true,
            post_injection_hook: DEFAULT_POST_INJECTION_HOOK.to_string(),
            auto_map_outlets: false,
            missing_receiver: MissingReceiver::Error,
        }
    }
}

impl SystemConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables strict injections.
    #[must_use]
    pub fn with_strict_injections(mut self, strict: bool) -> Self {
        self.strict_injections = strict;
        self
    }

    /// Sets the post-injection hook name.
    #[must_use]
    pub fn with_post_injection_hook(mut self, hook: impl Into<String>) -> Self {
        self.post_injection_hook = hook.into();
        self
    }

    /// Enables or disables automatic global outlets.
    #[must_use]
    pub fn with_auto_map_outlets(mut self, enabled: bool) -> Self {
        self.auto_map_outlets = enabled;
        self
    }

    /// Sets the stale receiver policy.
    #[must_use]
    pub fn with_missing_receiver(mut self, policy: MissingReceiver) -> Self {
        self.missing_receiver = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SystemConfig::default();
        assert!(config.strict_injections);
        assert_eq!(config.post_injection_hook, "setup");
        assert!(!config.auto_map_outlets);
        assert_eq!(config.missing_receiver, MissingReceiver::Error);
    }

    #[test]
    fn builders_override_defaults() {
        let config = SystemConfig::new()
            .with_strict_injections(false)
            .with_post_injection_hook("init")
            .with_auto_map_outlets(true)
            .with_missing_receiver(MissingReceiver::Skip);

        assert!(!config.strict_injections);
        assert_eq!(config.post_injection_hook, "init");
        assert!(config.auto_map_outlets);
        assert_eq!(config.missing_receiver, MissingReceiver::Skip);
    }
}
