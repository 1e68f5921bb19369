//! Key → mapping storage.
//!
//! A mapping tells the container how to produce the object for a key:
//!
//! | Kind | Created by | Resolution |
//! |------|------------|------------|
//! | Value | [`Provider::value`] | the stored object, always |
//! | Class | [`Provider::class`] | a fresh object on every call |
//! | Singleton | [`Provider::singleton`] | built once, then cached |
//!
//! At most one mapping exists per key. [`Registry::insert`] rejects a second
//! mapping unless the caller explicitly asks to replace it.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::actor::{Actor, Instance};
use crate::error::SystemError;

/// Type-erased no-argument constructor.
pub(crate) type Constructor = Arc<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

/// The kind of a mapping, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// A pre-built object.
    Value,
    /// A transient producer.
    Class,
    /// A cache-once producer.
    Singleton,
}

/// Describes how a key should be produced. Pass it to
/// [`System::map`](crate::system::System::map) or
/// [`System::remap`](crate::system::System::remap).
///
/// # Example
///
/// ```
/// use wirebox_system::actor::Actor;
/// use wirebox_system::registry::{MappingKind, Provider};
///
/// #[derive(Default)]
/// struct Counter;
/// impl Actor for Counter {}
///
/// assert_eq!(Provider::singleton(Counter::default).kind(), MappingKind::Singleton);
/// assert_eq!(Provider::class_of::<Counter>().kind(), MappingKind::Class);
/// assert_eq!(Provider::value(Counter).kind(), MappingKind::Value);
/// ```
pub struct Provider {
    pub(crate) source: ProviderSource,
}

pub(crate) enum ProviderSource {
    /// Owned value, injected before it is shared.
    Value(Box<dyn Actor>),
    /// Already shared value, stored as is.
    Shared(Instance),
    Class(Constructor),
    Singleton(Constructor),
}

impl Provider {
    /// A pre-built value. Outlets mapped for the key are injected into it
    /// when the mapping is registered.
    pub fn value<A: Actor>(value: A) -> Self {
        Self {
            source: ProviderSource::Value(Box::new(value)),
        }
    }

    /// An already shared instance, stored without injection.
    ///
    /// Use this to hand the same object to several containers.
    pub fn shared(instance: Instance) -> Self {
        Self {
            source: ProviderSource::Shared(instance),
        }
    }

    /// A transient producer: `constructor` runs on every resolution.
    pub fn class<A, F>(constructor: F) -> Self
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            source: ProviderSource::Class(erase(constructor)),
        }
    }

    /// A transient producer using `A::default`.
    pub fn class_of<A: Actor + Default>() -> Self {
        Self::class(A::default)
    }

    /// A singleton producer: `constructor` runs on first resolution and the
    /// result is cached.
    pub fn singleton<A, F>(constructor: F) -> Self
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            source: ProviderSource::Singleton(erase(constructor)),
        }
    }

    /// A singleton producer using `A::default`.
    pub fn singleton_of<A: Actor + Default>() -> Self {
        Self::singleton(A::default)
    }

    /// Returns the kind of mapping this provider creates.
    #[must_use]
    pub fn kind(&self) -> MappingKind {
        match self.source {
            ProviderSource::Value(_) | ProviderSource::Shared(_) => MappingKind::Value,
            ProviderSource::Class(_) => MappingKind::Class,
            ProviderSource::Singleton(_) => MappingKind::Singleton,
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("kind", &self.kind())
            .finish()
    }
}

fn erase<A, F>(constructor: F) -> Constructor
where
    A: Actor,
    F: Fn() -> A + Send + Sync + 'static,
{
    Arc::new(move || Box::new(constructor()) as Box<dyn Actor>)
}

/// A stored mapping.
pub(crate) enum Mapping {
    Value(Instance),
    Class(Constructor),
    Singleton {
        constructor: Constructor,
        cached: Option<Instance>,
    },
}

impl Mapping {
    pub(crate) fn kind(&self) -> MappingKind {
        match self {
            Mapping::Value(_) => MappingKind::Value,
            Mapping::Class(_) => MappingKind::Class,
            Mapping::Singleton { .. } => MappingKind::Singleton,
        }
    }
}

/// What the resolver must do to produce an object for a key.
pub(crate) enum Resolution {
    /// The object already exists.
    Ready(Instance),
    /// Run the creation protocol, caching the result if `cache` is set.
    Construct {
        constructor: Constructor,
        cache: bool,
    },
}

/// Mapping storage. Lookups are O(1) by key.
#[derive(Default)]
pub(crate) struct Registry {
    mappings: HashMap<String, Mapping>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Stores a mapping.
    ///
    /// Without `replace`, an existing mapping for `key` is an error. With
    /// `replace`, the old mapping (and any cached singleton) is dropped.
    pub(crate) fn insert(
        &mut self,
        key: String,
        mapping: Mapping,
        replace: bool,
    ) -> Result<Option<MappingKind>, SystemError> {
        if !replace && self.mappings.contains_key(&key) {
            return Err(SystemError::DuplicateMapping(key));
        }
        Ok(self.mappings.insert(key, mapping).map(|old| old.kind()))
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.mappings.contains_key(key)
    }

    pub(crate) fn kind(&self, key: &str) -> Option<MappingKind> {
        self.mappings.get(key).map(Mapping::kind)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Mapping> {
        self.mappings.remove(key)
    }

    /// Sorted list of mapped keys.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.mappings.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub(crate) fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Decides how to produce the object for `key`.
    ///
    /// `fresh` ignores the singleton cache. Values are returned as stored
    /// either way since there is nothing to construct.
    pub(crate) fn plan(&self, key: &str, fresh: bool) -> Option<Resolution> {
        let plan = match self.mappings.get(key)? {
            Mapping::Value(instance) => Resolution::Ready(Arc::clone(instance)),
            Mapping::Class(constructor) => Resolution::Construct {
                constructor: Arc::clone(constructor),
                cache: false,
            },
            Mapping::Singleton {
                constructor,
                cached,
            } => match cached {
                Some(instance) if !fresh => Resolution::Ready(Arc::clone(instance)),
                _ => Resolution::Construct {
                    constructor: Arc::clone(constructor),
                    cache: !fresh,
                },
            },
        };
        Some(plan)
    }

    /// Caches a freshly built singleton and returns the canonical instance.
    ///
    /// If a cached instance already exists (built re-entrantly while this one
    /// was under construction) it wins. If the key was unmapped or remapped
    /// in the meantime, `instance` is returned without being cached.
    pub(crate) fn cache(&mut self, key: &str, instance: Instance) -> Instance {
        match self.mappings.get_mut(key) {
            Some(Mapping::Singleton { cached, .. }) => {
                Arc::clone(cached.get_or_insert(instance))
            }
            _ => instance,
        }
    }
}
