//! The container.
//!
//! [`System`] owns the mapping registry, the outlet table and the handler
//! and callback tables. All methods take `&self`: state lives behind
//! [`RwLock`]s and no lock is held while user code runs (constructors,
//! hooks, handlers), so handlers can map, resolve and notify re-entrantly.
//!
//! # Creation protocol
//!
//! Producing an instance for a key always runs the same three steps:
//!
//! 1. Invoke the no-argument constructor.
//! 2. Apply outlet rules, global scope first, then the key's own scope.
//! 3. Run the post-injection hook (default `"setup"`).
//!
//! Outlets are always applied before the hook, so hook logic can rely on
//! injected properties.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wirebox_system::prelude::*;
//!
//! #[derive(Default)]
//! struct Model;
//! impl Actor for Model {}
//!
//! let system = System::new();
//! system.map_singleton_of::<Model>("model")?;
//!
//! let a = system.get_object("model")?;
//! let b = system.get_object("model")?;
//! assert!(Arc::ptr_eq(&a, &b));
//! # Ok::<(), SystemError>(())
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::RwLock;

use crate::actor::{Actor, Instance};
use crate::config::{MissingReceiver, SystemConfig};
use crate::error::{SystemError, require_non_empty};
use crate::event::handler::Binding;
use crate::event::{Callback, EventTable, Handler, Notification, Receiver};
use crate::outlet::{OutletRule, OutletTable, Scope};
use crate::payload::IntoPayload;
use crate::plugin::{Plugin, PluginId};
use crate::registry::{
    Constructor, Mapping, MappingKind, Provider, ProviderSource, Registry, Resolution,
};

/// Resolved target of a handler binding.
enum Target {
    Instance(Instance),
    Unattached,
    /// Receiver is unmapped and the policy says skip.
    Skipped,
}

/// An inversion-of-control container with event mediation.
pub struct System {
    config: RwLock<SystemConfig>,
    registry: RwLock<Registry>,
    outlets: RwLock<OutletTable>,
    handlers: RwLock<EventTable<Binding>>,
    callbacks: RwLock<EventTable<Callback>>,
    plugins: RwLock<HashSet<PluginId>>,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        let mut map = f.debug_map();
        for key in registry.keys() {
            map.entry(&key, &registry.kind(&key));
        }
        map.finish()
    }
}

impl System {
    /// Creates an empty container with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    /// Creates an empty container with `config`.
    #[must_use]
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            config: RwLock::new(config),
            registry: RwLock::new(Registry::new()),
            outlets: RwLock::new(OutletTable::new()),
            handlers: RwLock::new(EventTable::new()),
            callbacks: RwLock::new(EventTable::new()),
            plugins: RwLock::new(HashSet::new()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> SystemConfig {
        self.config.read().clone()
    }

    /// Replaces the configuration.
    pub fn set_config(&self, config: SystemConfig) {
        *self.config.write() = config;
    }

    /// Updates the configuration in place.
    ///
    /// ```
    /// use wirebox_system::system::System;
    ///
    /// let system = System::new();
    /// system.configure(|config| config.strict_injections = false);
    /// assert!(!system.config().strict_injections);
    /// ```
    pub fn configure(&self, update: impl FnOnce(&mut SystemConfig)) {
        update(&mut self.config.write());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers `provider` under `key`.
    ///
    /// Value providers are injected (outlets + post-injection hook) before
    /// they are stored.
    ///
    /// # Errors
    ///
    /// - [`SystemError::InvalidArgument`] if `key` is empty
    /// - [`SystemError::DuplicateMapping`] if `key` is already mapped
    /// - any error raised while injecting a value provider
    pub fn map(&self, key: &str, provider: Provider) -> Result<&Self, SystemError> {
        self.insert_mapping(key, provider, false)
    }

    /// Registers `provider` under `key`, replacing any existing mapping and
    /// dropping its cached singleton.
    ///
    /// # Errors
    ///
    /// [`SystemError::InvalidArgument`] if `key` is empty, or any error
    /// raised while injecting a value provider.
    pub fn remap(&self, key: &str, provider: Provider) -> Result<&Self, SystemError> {
        self.insert_mapping(key, provider, true)
    }

    /// Maps `key` to a pre-built value.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn map_value<A: Actor>(&self, key: &str, value: A) -> Result<&Self, SystemError> {
        self.map(key, Provider::value(value))
    }

    /// Maps `key` to a transient producer.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn map_class<A, F>(&self, key: &str, constructor: F) -> Result<&Self, SystemError>
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.map(key, Provider::class(constructor))
    }

    /// Maps `key` to a transient producer using `A::default`.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn map_class_of<A: Actor + Default>(&self, key: &str) -> Result<&Self, SystemError> {
        self.map(key, Provider::class_of::<A>())
    }

    /// Maps `key` to a singleton producer.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn map_singleton<A, F>(&self, key: &str, constructor: F) -> Result<&Self, SystemError>
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.map(key, Provider::singleton(constructor))
    }

    /// Maps `key` to a singleton producer using `A::default`.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn map_singleton_of<A: Actor + Default>(&self, key: &str) -> Result<&Self, SystemError> {
        self.map(key, Provider::singleton_of::<A>())
    }

    /// Returns `true` if `key` is mapped.
    #[must_use]
    pub fn has_mapping(&self, key: &str) -> bool {
        self.registry.read().contains(key)
    }

    /// Returns the kind of the mapping for `key`.
    #[must_use]
    pub fn mapping_kind(&self, key: &str) -> Option<MappingKind> {
        self.registry.read().kind(key)
    }

    /// Returns all mapped keys, sorted.
    #[must_use]
    pub fn mapped_keys(&self) -> Vec<String> {
        self.registry.read().keys()
    }

    /// Returns the number of mappings.
    #[must_use]
    pub fn mapping_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Removes the mapping for `key`. Returns `true` if one existed.
    ///
    /// Outlet rules and handler mappings that mention `key` are left in
    /// place.
    pub fn unmap(&self, key: &str) -> bool {
        let removed = self.registry.write().remove(key).is_some();
        if removed {
            tracing::debug!(key, "unmapped");
        }
        removed
    }

    fn insert_mapping(
        &self,
        key: &str,
        provider: Provider,
        replace: bool,
    ) -> Result<&Self, SystemError> {
        require_non_empty(key, "mapping key must not be empty")?;
        if !replace && self.has_mapping(key) {
            return Err(SystemError::DuplicateMapping(key.to_string()));
        }

        let kind = provider.kind();
        let mapping = match provider.source {
            ProviderSource::Value(mut value) => {
                self.inject_dyn(key, value.as_mut())?;
                Mapping::Value(Arc::from(value))
            }
            ProviderSource::Shared(instance) => Mapping::Value(instance),
            ProviderSource::Class(constructor) => Mapping::Class(constructor),
            ProviderSource::Singleton(constructor) => Mapping::Singleton {
                constructor,
                cached: None,
            },
        };

        let previous = self
            .registry
            .write()
            .insert(key.to_string(), mapping, replace)?;
        tracing::debug!(key, ?kind, ?previous, "mapped");

        if self.config.read().auto_map_outlets {
            self.map_global_outlet(key)?;
        }
        Ok(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the object for `key`.
    ///
    /// Values are returned as stored, singletons are built on first use and
    /// cached, classes are built fresh every call.
    ///
    /// # Errors
    ///
    /// - [`SystemError::MissingMapping`] if `key` (or an outlet source needed
    ///   to build it) is not mapped
    /// - injection or hook errors raised while building
    pub fn get_object(&self, key: &str) -> Result<Instance, SystemError> {
        self.resolve(key, false)
    }

    /// Returns the object for `key` as a concrete type.
    ///
    /// # Errors
    ///
    /// As [`get_object`](Self::get_object), plus
    /// [`SystemError::DowncastFailed`] if the object is not a `T`.
    pub fn get<T: Actor>(&self, key: &str) -> Result<Arc<T>, SystemError> {
        downcast(key, self.get_object(key)?)
    }

    /// Builds a brand-new object for `key`, ignoring the singleton cache.
    ///
    /// Value mappings have no constructor, so the stored value is returned.
    ///
    /// # Errors
    ///
    /// As [`get_object`](Self::get_object).
    pub fn instantiate(&self, key: &str) -> Result<Instance, SystemError> {
        self.resolve(key, true)
    }

    /// [`instantiate`](Self::instantiate) as a concrete type.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get).
    pub fn instantiate_as<T: Actor>(&self, key: &str) -> Result<Arc<T>, SystemError> {
        downcast(key, self.instantiate(key)?)
    }

    /// Applies the outlet rules for `key` to an externally built instance,
    /// then runs the post-injection hook.
    ///
    /// # Errors
    ///
    /// Resolution, injection or hook errors.
    pub fn inject_into<A: Actor>(&self, key: &str, instance: &mut A) -> Result<(), SystemError> {
        self.inject_dyn(key, instance)
    }

    fn resolve(&self, key: &str, fresh: bool) -> Result<Instance, SystemError> {
        let plan = self
            .registry
            .read()
            .plan(key, fresh)
            .ok_or_else(|| SystemError::MissingMapping(key.to_string()))?;

        match plan {
            Resolution::Ready(instance) => Ok(instance),
            Resolution::Construct { constructor, cache } => {
                let instance = self.construct(key, &constructor)?;
                if cache {
                    Ok(self.registry.write().cache(key, instance))
                } else {
                    Ok(instance)
                }
            }
        }
    }

    fn construct(&self, key: &str, constructor: &Constructor) -> Result<Instance, SystemError> {
        let mut actor = constructor();
        self.inject_dyn(key, actor.as_mut())?;
        tracing::trace!(key, type_name = Actor::type_name(actor.as_ref()), "constructed");
        Ok(Arc::from(actor))
    }

    fn inject_dyn(&self, key: &str, instance: &mut dyn Actor) -> Result<(), SystemError> {
        let (strict, hook) = {
            let config = self.config.read();
            (config.strict_injections, config.post_injection_hook.clone())
        };
        let rules = self.outlets.read().rules_for(key);

        for rule in rules {
            // An instance never receives itself.
            if rule.source == key {
                continue;
            }
            if strict && !instance.has_outlet(&rule.property) {
                tracing::trace!(key, property = %rule.property, "outlet not declared, skipped");
                continue;
            }

            let value = self.get_object(&rule.source)?;
            match instance.inject(&rule.property, value) {
                Ok(true) => {
                    tracing::trace!(key, property = %rule.property, source = %rule.source, "injected");
                }
                Ok(false) => {
                    tracing::trace!(key, property = %rule.property, "outlet not accepted");
                }
                Err(source) => {
                    return Err(SystemError::Injection {
                        target: key.to_string(),
                        property: rule.property,
                        source_key: rule.source,
                        source,
                    });
                }
            }
        }

        match instance.hook(&hook) {
            Ok(ran) => {
                if ran {
                    tracing::trace!(key, hook = %hook, "post-injection hook ran");
                }
                Ok(())
            }
            Err(source) => Err(SystemError::HookFailed {
                key: key.to_string(),
                hook,
                source,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outlets
    // ─────────────────────────────────────────────────────────────────────────

    /// Injects the object for `source` into `property` of every instance
    /// produced for `target` (or every instance, for [`Scope::Global`]).
    ///
    /// Mapping the same (target, property) again replaces the source.
    ///
    /// # Errors
    ///
    /// [`SystemError::InvalidArgument`] if `source`, `property` or a keyed
    /// target is empty.
    pub fn map_outlet(
        &self,
        source: &str,
        target: impl Into<Scope>,
        property: &str,
    ) -> Result<&Self, SystemError> {
        let target = target.into();
        require_non_empty(source, "outlet source must not be empty")?;
        require_non_empty(property, "outlet property must not be empty")?;
        if let Scope::Key(key) = &target {
            require_non_empty(key, "outlet target must not be empty")?;
        }

        tracing::debug!(source, target = %target, property, "outlet mapped");
        self.outlets.write().insert(OutletRule {
            source: source.to_string(),
            target,
            property: property.to_string(),
        });
        Ok(self)
    }

    /// Maps a global outlet whose property is named after `source`.
    ///
    /// # Errors
    ///
    /// As [`map_outlet`](Self::map_outlet).
    pub fn map_global_outlet(&self, source: &str) -> Result<&Self, SystemError> {
        self.map_outlet(source, Scope::Global, source)
    }

    /// Maps an outlet on `target` whose property is named after `source`.
    ///
    /// # Errors
    ///
    /// As [`map_outlet`](Self::map_outlet).
    pub fn map_outlet_to(
        &self,
        source: &str,
        target: impl Into<Scope>,
    ) -> Result<&Self, SystemError> {
        self.map_outlet(source, target, source)
    }

    /// Removes the outlet rule for (target, property). Returns `true` if one
    /// existed.
    pub fn unmap_outlet(&self, target: impl Into<Scope>, property: &str) -> bool {
        self.outlets.write().remove(&target.into(), property)
    }

    /// Returns `true` if an outlet rule exists for (target, property).
    #[must_use]
    pub fn has_outlet(&self, target: impl Into<Scope>, property: &str) -> bool {
        self.outlets.read().contains(&target.into(), property)
    }

    /// Returns the rules applied to instances of `key`, in application
    /// order.
    #[must_use]
    pub fn outlets_for(&self, key: &str) -> Vec<OutletRule> {
        self.outlets.read().rules_for(key)
    }

    /// Returns the total number of outlet rules.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.outlets.read().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    /// Maps `handler` on `receiver` to `event`.
    ///
    /// The receiver key is resolved at dispatch time. A one-shot handler is
    /// removed the first time it fires.
    ///
    /// # Errors
    ///
    /// - [`SystemError::InvalidArgument`] for an empty event, key or method
    ///   name, or a method handler without a keyed receiver
    /// - [`SystemError::DuplicateHandler`] if the exact triple is mapped
    pub fn map_handler(
        &self,
        event: &str,
        receiver: impl Into<Receiver>,
        handler: impl Into<Handler>,
        one_shot: bool,
    ) -> Result<&Self, SystemError> {
        let binding = Binding {
            receiver: receiver.into(),
            handler: handler.into(),
        };
        require_non_empty(event, "event name must not be empty")?;
        match (&binding.receiver, &binding.handler) {
            (Receiver::Key(key), _) => require_non_empty(key, "receiver key must not be empty")?,
            (Receiver::Unattached, Handler::Method(_)) => {
                return Err(SystemError::InvalidArgument(
                    "method handlers need a receiver key",
                ));
            }
            (Receiver::Unattached, Handler::Function(_)) => {}
        }
        if let Handler::Method(method) = &binding.handler {
            require_non_empty(method, "handler method must not be empty")?;
        }

        let mut handlers = self.handlers.write();
        if handlers.contains(event, &binding) {
            return Err(SystemError::DuplicateHandler {
                event: event.to_string(),
                receiver: binding.receiver.to_string(),
                handler: binding.handler.to_string(),
            });
        }
        tracing::debug!(
            event,
            receiver = %binding.receiver,
            handler = %binding.handler,
            one_shot,
            "handler mapped"
        );
        handlers.insert(event, binding, one_shot);
        Ok(self)
    }

    /// Maps the method named after `event` on `key` as the event's handler.
    ///
    /// # Errors
    ///
    /// As [`map_handler`](Self::map_handler).
    pub fn map_event_handler(
        &self,
        event: &str,
        key: &str,
        one_shot: bool,
    ) -> Result<&Self, SystemError> {
        self.map_handler(event, key, event, one_shot)
    }

    /// Removes the matching (event, receiver, handler) mapping. Returns
    /// `true` if it existed.
    pub fn unmap_handler(
        &self,
        event: &str,
        receiver: impl Into<Receiver>,
        handler: impl Into<Handler>,
    ) -> bool {
        let binding = Binding {
            receiver: receiver.into(),
            handler: handler.into(),
        };
        self.handlers.write().remove(event, &binding)
    }

    /// Returns `true` if the (event, receiver, handler) mapping exists.
    #[must_use]
    pub fn has_handler(
        &self,
        event: &str,
        receiver: impl Into<Receiver>,
        handler: impl Into<Handler>,
    ) -> bool {
        let binding = Binding {
            receiver: receiver.into(),
            handler: handler.into(),
        };
        self.handlers.read().contains(event, &binding)
    }

    /// Returns the number of handlers mapped to `event`.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.read().count(event)
    }

    /// Returns every event with at least one handler or callback, sorted.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        let mut events = self.handlers.read().events();
        events.extend(self.callbacks.read().events());
        events.sort_unstable();
        events.dedup();
        events
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers `callback` for `event`.
    ///
    /// # Errors
    ///
    /// [`SystemError::InvalidArgument`] if `event` is empty.
    pub fn add_callback(
        &self,
        event: &str,
        callback: Callback,
        one_shot: bool,
    ) -> Result<&Self, SystemError> {
        require_non_empty(event, "event name must not be empty")?;
        tracing::debug!(event, one_shot, "callback added");
        self.callbacks.write().insert(event, callback, one_shot);
        Ok(self)
    }

    /// Removes every registration of `callback` for `event`. Returns `true`
    /// if any existed.
    pub fn remove_callback(&self, event: &str, callback: &Callback) -> bool {
        self.callbacks.write().remove(event, callback)
    }

    /// Returns `true` if `callback` is registered for `event`.
    #[must_use]
    pub fn has_callback(&self, event: &str, callback: &Callback) -> bool {
        self.callbacks.read().contains(event, callback)
    }

    /// Returns the number of callbacks registered for `event`.
    #[must_use]
    pub fn callback_count(&self, event: &str) -> usize {
        self.callbacks.read().count(event)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notification
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatches `event` with `payload` to its handlers, then its callbacks.
    ///
    /// # Errors
    ///
    /// The first error stops the dispatch:
    ///
    /// - [`SystemError::MissingReceiver`] if a receiver key is unmapped and
    ///   the policy is [`MissingReceiver::Error`]
    /// - [`SystemError::UnknownMethod`] if a receiver lacks the named method
    /// - [`SystemError::HandlerFailed`] if a handler or callback fails
    /// - resolution errors raised while building a receiver
    pub fn notify(&self, event: &str, payload: impl IntoPayload) -> Result<(), SystemError> {
        let payload = payload.into_payload();
        let notification = Notification::new(event, &payload, self);
        tracing::trace!(event, args = payload.len(), "notify");

        let handlers = self.handlers.read().snapshot(event);
        for entry in handlers {
            if entry.one_shot && !self.handlers.read().is_live(event, entry.id) {
                continue;
            }

            let target = self.target_for(event, &entry.item.receiver)?;
            if matches!(target, Target::Skipped) {
                continue;
            }

            if entry.one_shot {
                let claimed = self.handlers.write().claim(event, entry.id);
                if !claimed {
                    continue;
                }
            }

            self.invoke(&entry.item, target, &notification)?;
        }

        let callbacks = self.callbacks.read().snapshot(event);
        for entry in callbacks {
            if entry.one_shot {
                let claimed = self.callbacks.write().claim(event, entry.id);
                if !claimed {
                    continue;
                }
            }

            entry
                .item
                .call(&notification)
                .map_err(|source| SystemError::HandlerFailed {
                    event: event.to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    fn target_for(&self, event: &str, receiver: &Receiver) -> Result<Target, SystemError> {
        let key = match receiver {
            Receiver::Unattached => return Ok(Target::Unattached),
            Receiver::Key(key) => key,
        };

        if !self.has_mapping(key) {
            let policy = self.config.read().missing_receiver;
            return match policy {
                MissingReceiver::Error => Err(SystemError::MissingReceiver {
                    event: event.to_string(),
                    key: key.clone(),
                }),
                MissingReceiver::Skip => {
                    tracing::warn!(event, key = %key, "receiver is not mapped, handler skipped");
                    Ok(Target::Skipped)
                }
            };
        }

        self.get_object(key).map(Target::Instance)
    }

    fn invoke(
        &self,
        binding: &Binding,
        target: Target,
        notification: &Notification<'_>,
    ) -> Result<(), SystemError> {
        let event = notification.event();
        let receiver = match target {
            Target::Instance(instance) => Some(instance),
            Target::Unattached | Target::Skipped => None,
        };

        match (&binding.handler, receiver) {
            (Handler::Method(method), Some(instance)) => {
                match instance.handle(method, notification) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(SystemError::UnknownMethod {
                        event: event.to_string(),
                        key: binding.receiver.to_string(),
                        method: method.clone(),
                    }),
                    Err(source) => Err(SystemError::HandlerFailed {
                        event: event.to_string(),
                        source,
                    }),
                }
            }
            (Handler::Method(_), None) => Err(SystemError::InvalidArgument(
                "method handlers need a receiver key",
            )),
            (Handler::Function(function), receiver) => function
                .call(receiver.as_ref(), notification)
                .map_err(|source| SystemError::HandlerFailed {
                    event: event.to_string(),
                    source,
                }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plugins
    // ─────────────────────────────────────────────────────────────────────────

    /// Builds `plugin` against this container.
    ///
    /// # Errors
    ///
    /// [`SystemError::DuplicatePlugin`] if a unique plugin of the same type
    /// was already added, or any error returned by [`Plugin::build`].
    ///
    /// A plugin whose build fails is not recorded, so it can be added again.
    pub fn add_plugin<P: Plugin>(&self, plugin: P) -> Result<&Self, SystemError> {
        let id = PluginId::of::<P>();
        let inserted = self.plugins.write().insert(id);
        if !inserted && plugin.is_unique() {
            return Err(SystemError::DuplicatePlugin(plugin.name().to_string()));
        }

        tracing::debug!(plugin = plugin.name(), "building plugin");
        if let Err(err) = plugin.build(self) {
            if inserted {
                self.plugins.write().remove(&id);
            }
            tracing::debug!(plugin = plugin.name(), error = %err, "plugin build failed");
            return Err(err);
        }
        Ok(self)
    }

    /// Returns `true` if a plugin of type `P` was added.
    #[must_use]
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        self.plugins.read().contains(&PluginId::of::<P>())
    }
}

fn downcast<T: Actor>(key: &str, instance: Instance) -> Result<Arc<T>, SystemError> {
    instance
        .downcast_arc::<T>()
        .map_err(|actual| SystemError::DowncastFailed {
            key: key.to_string(),
            expected: core::any::type_name::<T>(),
            actual: Actor::type_name(&*actual),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{BoxError, InjectError, Outlet};
    use crate::event::HandlerFn;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Leaf;
    impl Actor for Leaf {}

    /// Records the order of injection and setup.
    #[derive(Default)]
    struct Recorder {
        leaf: Outlet<Leaf>,
        log: Mutex<Vec<String>>,
        hits: AtomicUsize,
    }

    impl Actor for Recorder {
        fn has_outlet(&self, property: &str) -> bool {
            property == "leaf"
        }

        fn inject(&mut self, property: &str, value: Instance) -> Result<bool, InjectError> {
            match property {
                "leaf" => {
                    self.log.get_mut().unwrap().push("inject".into());
                    self.leaf.fill(property, value)
                }
                _ => Ok(false),
            }
        }

        fn hook(&mut self, name: &str) -> Result<bool, BoxError> {
            let filled = self.leaf.is_filled();
            self.log
                .get_mut()
                .unwrap()
                .push(format!("{name}:{filled}"));
            Ok(name == "setup")
        }

        fn handle(&self, method: &str, _notification: &Notification<'_>) -> Result<bool, BoxError> {
            match method {
                "hit" => {
                    self.hits.fetch_add(1, Ordering::SeqCst);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    #[test]
    fn empty_key_is_invalid() {
        let system = System::new();
        let result = system.map_class_of::<Leaf>("");
        assert!(matches!(result, Err(SystemError::InvalidArgument(_))));
    }

    #[test]
    fn injection_precedes_hook() {
        let system = System::new();
        system.map_class_of::<Leaf>("leaf").unwrap();
        system.map_class_of::<Recorder>("recorder").unwrap();
        system.map_outlet("leaf", "recorder", "leaf").unwrap();

        let recorder = system.get::<Recorder>("recorder").unwrap();
        let log = recorder.log.lock().unwrap().clone();
        assert_eq!(log, vec!["inject", "setup:true"]);
    }

    #[test]
    fn configured_hook_name_is_used() {
        let system = System::with_config(SystemConfig::new().with_post_injection_hook("init"));
        system.map_class_of::<Recorder>("recorder").unwrap();

        let recorder = system.get::<Recorder>("recorder").unwrap();
        assert_eq!(*recorder.log.lock().unwrap(), vec!["init:false"]);
    }

    #[test]
    fn self_outlets_are_ignored() {
        let system = System::with_config(SystemConfig::new().with_strict_injections(false));
        system.map_singleton_of::<Recorder>("leaf").unwrap();
        system.map_global_outlet("leaf").unwrap();

        // Would recurse forever if the singleton were injected into itself.
        assert!(system.get_object("leaf").is_ok());
    }

    #[test]
    fn get_reports_downcast_failure() {
        let system = System::new();
        system.map_class_of::<Leaf>("leaf").unwrap();

        match system.get::<Recorder>("leaf").err() {
            Some(SystemError::DowncastFailed { key, actual, .. }) => {
                assert_eq!(key, "leaf");
                assert!(actual.ends_with("Leaf"));
            }
            other => panic!("expected downcast failure, got {other:?}"),
        }
    }

    #[test]
    fn method_handler_requires_receiver() {
        let system = System::new();
        let result = system.map_handler("e", Receiver::Unattached, "hit", false);
        assert!(matches!(result, Err(SystemError::InvalidArgument(_))));
    }

    #[test]
    fn duplicate_triple_is_rejected() {
        let system = System::new();
        system.map_handler("e", "a", "hit", false).unwrap();

        let result = system.map_handler("e", "a", "hit", true);
        assert!(matches!(result, Err(SystemError::DuplicateHandler { .. })));

        // Same event and key with a different handler is fine.
        system.map_handler("e", "a", "other", false).unwrap();
        assert_eq!(system.handler_count("e"), 2);
    }

    #[test]
    fn unknown_method_is_reported() {
        let system = System::new();
        system.map_singleton_of::<Recorder>("r").unwrap();
        system.map_handler("e", "r", "missing", false).unwrap();

        let result = system.notify("e", ());
        assert!(matches!(
            result,
            Err(SystemError::UnknownMethod { method, .. }) if method == "missing"
        ));
    }

    #[test]
    fn handler_errors_stop_dispatch() {
        let system = System::new();
        let later = Arc::new(AtomicUsize::new(0));
        let later_clone = Arc::clone(&later);

        let failing = HandlerFn::new(|_, _| Err("boom".into()));
        let counting = HandlerFn::new(move |_, _| {
            later_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        system
            .map_handler("e", Receiver::Unattached, failing, false)
            .unwrap();
        system
            .map_handler("e", Receiver::Unattached, counting, false)
            .unwrap();

        let result = system.notify("e", ());
        match result {
            Err(SystemError::HandlerFailed { event, source }) => {
                assert_eq!(event, "e");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected handler failure, got {other:?}"),
        }
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn debug_lists_mappings() {
        let system = System::new();
        system.map_class_of::<Leaf>("leaf").unwrap();
        let rendered = format!("{system:?}");
        assert!(rendered.contains("leaf"));
        assert!(rendered.contains("Class"));
    }
}
