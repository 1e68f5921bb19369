//! Declarative wirings loaded from JSON.
//!
//! A [`Catalog`] names the constructors an application can wire. A
//! [`WiringPlugin`] pairs a catalog with a JSON document and maps everything
//! the document describes when it is added to a [`System`].
//!
//! # Document format
//!
//! ```json
//! {
//!     "config": { "strictInjections": true, "postInjectionHook": "setup" },
//!     "wirings": {
//!         "userModel": { "impl": "UserModel", "singleton": true },
//!         "view": {
//!             "impl": "View",
//!             "outlets": [{ "source": "userModel", "property": "model" }],
//!             "handlers": [{ "event": "show", "handler": "render" }]
//!         }
//!     },
//!     "outlets": [{ "source": "clock" }]
//! }
//! ```
//!
//! Every field except `impl` is optional. An outlet's `property` defaults to
//! its `source`, a handler's `handler` defaults to its `event`, and the
//! top-level `outlets` are global.
//!
//! Keys are mapped in sorted order, then outlets, then handlers, so a
//! document wires the same way on every run.
//!
//! # Example
//!
//! ```
//! use wirebox_core_plugins::{Catalog, WiringPlugin};
//! use wirebox_system::prelude::*;
//!
//! #[derive(Default)]
//! struct UserModel;
//! impl Actor for UserModel {}
//!
//! let catalog = Catalog::new().with_default::<UserModel>("UserModel");
//! let plugin = WiringPlugin::from_json(
//!     catalog,
//!     r#"{ "wirings": { "user": { "impl": "UserModel", "singleton": true } } }"#,
//! )?;
//!
//! let system = System::new();
//! system.add_plugin(plugin)?;
//! assert_eq!(system.mapping_kind("user"), Some(MappingKind::Singleton));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use wirebox_system::actor::Actor;
use wirebox_system::config::{MissingReceiver, SystemConfig};
use wirebox_system::error::SystemError;
use wirebox_system::outlet::Scope;
use wirebox_system::plugin::Plugin;
use wirebox_system::registry::Provider;
use wirebox_system::system::System;

/// Errors raised while loading a wiring document.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// The document is not valid JSON or does not match the format.
    #[error("invalid wiring document: {0}")]
    Json(#[from] serde_json::Error),

    /// A wiring names an implementation the catalog does not know.
    #[error("wiring '{key}' uses unknown implementation '{name}'")]
    UnknownImplementation {
        /// The wiring key.
        key: String,
        /// The implementation name.
        name: String,
    },

    /// An entry is structurally valid but unusable.
    #[error("invalid wiring entry: {0}")]
    InvalidEntry(String),

    /// Mapping the document failed.
    #[error(transparent)]
    System(#[from] SystemError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

type Factory = Arc<dyn Fn(bool) -> Provider + Send + Sync>;

/// Named constructors available to wiring documents.
#[derive(Clone, Default)]
pub struct Catalog {
    factories: BTreeMap<String, Factory>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`.
    ///
    /// Registering a name twice replaces the earlier constructor.
    pub fn register<A, F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        let constructor = Arc::new(constructor);
        let factory: Factory = Arc::new(move |singleton| {
            let constructor = Arc::clone(&constructor);
            if singleton {
                Provider::singleton(move || constructor())
            } else {
                Provider::class(move || constructor())
            }
        });
        self.factories.insert(name.into(), factory);
        self
    }

    /// Registers `constructor` under `name`, builder style.
    #[must_use]
    pub fn with<A, F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.register(name, constructor);
        self
    }

    /// Registers `A::default` under `name`, builder style.
    #[must_use]
    pub fn with_default<A: Actor + Default>(self, name: impl Into<String>) -> Self {
        self.with(name, A::default)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    fn provider(&self, name: &str, singleton: bool) -> Option<Provider> {
        self.factories.get(name).map(|factory| factory(singleton))
    }
}

impl core::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed wiring document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WiringDocument {
    /// Container configuration overrides.
    #[serde(default)]
    pub config: Option<ConfigSection>,
    /// Mappings by key.
    #[serde(default)]
    pub wirings: BTreeMap<String, Wiring>,
    /// Global outlets.
    #[serde(default)]
    pub outlets: Vec<OutletEntry>,
}

/// Configuration overrides. Absent fields keep the container's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigSection {
    /// Overrides [`SystemConfig::strict_injections`].
    pub strict_injections: Option<bool>,
    /// Overrides [`SystemConfig::post_injection_hook`].
    pub post_injection_hook: Option<String>,
    /// Overrides [`SystemConfig::auto_map_outlets`].
    pub auto_map_outlets: Option<bool>,
    /// Overrides [`SystemConfig::missing_receiver`].
    pub missing_receiver: Option<MissingReceiverPolicy>,
}

/// Serialized form of [`MissingReceiver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingReceiverPolicy {
    /// [`MissingReceiver::Error`].
    Error,
    /// [`MissingReceiver::Skip`].
    Skip,
}

impl From<MissingReceiverPolicy> for MissingReceiver {
    fn from(policy: MissingReceiverPolicy) -> Self {
        match policy {
            MissingReceiverPolicy::Error => Self::Error,
            MissingReceiverPolicy::Skip => Self::Skip,
        }
    }
}

impl ConfigSection {
    /// Applies the overrides to `config`.
    pub fn apply(&self, config: &mut SystemConfig) {
        if let Some(strict) = self.strict_injections {
            config.strict_injections = strict;
        }
        if let Some(hook) = &self.post_injection_hook {
            config.post_injection_hook.clone_from(hook);
        }
        if let Some(auto) = self.auto_map_outlets {
            config.auto_map_outlets = auto;
        }
        if let Some(policy) = self.missing_receiver {
            config.missing_receiver = policy.into();
        }
    }
}

/// One keyed mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Wiring {
    /// Catalog name of the implementation.
    #[serde(rename = "impl")]
    pub implementation: String,
    /// Cache the first instance. Defaults to `false` (transient).
    #[serde(default)]
    pub singleton: bool,
    /// Outlets applied to this key's instances.
    #[serde(default)]
    pub outlets: Vec<OutletEntry>,
    /// Handlers invoked on this key's instances.
    #[serde(default)]
    pub handlers: Vec<HandlerEntry>,
}

/// An outlet rule. `property` defaults to `source`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutletEntry {
    /// Key to inject.
    pub source: String,
    /// Property receiving the object.
    #[serde(default)]
    pub property: Option<String>,
}

impl OutletEntry {
    fn property(&self) -> &str {
        self.property.as_deref().unwrap_or(&self.source)
    }
}

/// A method handler. `handler` defaults to `event`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandlerEntry {
    /// Event name.
    pub event: String,
    /// Method name on the receiver.
    #[serde(default)]
    pub handler: Option<String>,
    /// Remove after the first invocation.
    #[serde(default)]
    pub one_shot: bool,
}

impl HandlerEntry {
    fn handler(&self) -> &str {
        self.handler.as_deref().unwrap_or(&self.event)
    }
}

impl WiringDocument {
    /// Parses a document from JSON.
    ///
    /// # Errors
    ///
    /// [`WiringError::Json`] if the text is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, WiringError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every implementation name against `catalog` and rejects
    /// entries with empty names.
    ///
    /// # Errors
    ///
    /// [`WiringError::UnknownImplementation`] or [`WiringError::InvalidEntry`].
    pub fn validate(&self, catalog: &Catalog) -> Result<(), WiringError> {
        for (key, wiring) in &self.wirings {
            if key.is_empty() {
                return Err(WiringError::InvalidEntry("wiring key is empty".into()));
            }
            if !catalog.contains(&wiring.implementation) {
                return Err(WiringError::UnknownImplementation {
                    key: key.clone(),
                    name: wiring.implementation.clone(),
                });
            }
            for outlet in &wiring.outlets {
                if outlet.source.is_empty() {
                    return Err(WiringError::InvalidEntry(format!(
                        "outlet on '{key}' has an empty source"
                    )));
                }
            }
            for handler in &wiring.handlers {
                if handler.event.is_empty() {
                    return Err(WiringError::InvalidEntry(format!(
                        "handler on '{key}' has an empty event"
                    )));
                }
            }
        }
        if self.outlets.iter().any(|outlet| outlet.source.is_empty()) {
            return Err(WiringError::InvalidEntry(
                "global outlet has an empty source".into(),
            ));
        }
        Ok(())
    }

    /// Maps the document into `system`: configuration, then keys, then
    /// outlets, then handlers.
    ///
    /// # Errors
    ///
    /// [`SystemError`] from any mapping call. The document should be
    /// [validated](Self::validate) first; unknown implementations are
    /// reported as [`SystemError::InvalidArgument`].
    pub fn apply(&self, catalog: &Catalog, system: &System) -> Result<(), SystemError> {
        if let Some(config) = &self.config {
            system.configure(|current| config.apply(current));
        }

        for (key, wiring) in &self.wirings {
            let provider = catalog
                .provider(&wiring.implementation, wiring.singleton)
                .ok_or(SystemError::InvalidArgument(
                    "wiring uses an implementation missing from the catalog",
                ))?;
            system.map(key, provider)?;
        }

        for outlet in &self.outlets {
            system.map_outlet(&outlet.source, Scope::Global, outlet.property())?;
        }
        for (key, wiring) in &self.wirings {
            for outlet in &wiring.outlets {
                system.map_outlet(&outlet.source, key, outlet.property())?;
            }
        }

        for (key, wiring) in &self.wirings {
            for handler in &wiring.handlers {
                system.map_handler(
                    &handler.event,
                    key.as_str(),
                    handler.handler(),
                    handler.one_shot,
                )?;
            }
        }

        tracing::debug!(
            wirings = self.wirings.len(),
            global_outlets = self.outlets.len(),
            "wiring document applied"
        );
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WiringPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Maps a validated [`WiringDocument`] when added to a [`System`].
///
/// Not unique: an application may add one plugin per document.
#[derive(Debug, Clone)]
pub struct WiringPlugin {
    catalog: Catalog,
    document: WiringDocument,
}

impl WiringPlugin {
    /// Creates a plugin from an already parsed document.
    ///
    /// # Errors
    ///
    /// See [`WiringDocument::validate`].
    pub fn new(catalog: Catalog, document: WiringDocument) -> Result<Self, WiringError> {
        document.validate(&catalog)?;
        Ok(Self { catalog, document })
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// See [`WiringDocument::from_json`] and [`WiringDocument::validate`].
    pub fn from_json(catalog: Catalog, json: &str) -> Result<Self, WiringError> {
        Self::new(catalog, WiringDocument::from_json(json)?)
    }

    /// Returns the document.
    #[must_use]
    pub fn document(&self) -> &WiringDocument {
        &self.document
    }
}

impl Plugin for WiringPlugin {
    fn build(&self, system: &System) -> Result<(), SystemError> {
        self.document.apply(&self.catalog, system)
    }

    fn name(&self) -> &str {
        "wirebox::wiring"
    }

    fn is_unique(&self) -> bool {
        false
    }
}
