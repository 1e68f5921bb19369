//! Outlet rules.
//!
//! An outlet rule says: when producing an instance for `target`, set its
//! `property` to the object resolved for `source`. Rules registered under
//! [`Scope::Global`] apply to every instance the container produces.
//!
//! Rules are applied global scope first, then key scope, each in insertion
//! order. Re-mapping an existing (target, property) pair replaces its source
//! without moving it.

use core::fmt;

use hashbrown::HashMap;

/// The reserved target name for global rules.
pub const GLOBAL: &str = "global";

/// Which instances an outlet rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every produced instance.
    Global,
    /// Instances produced for one key.
    Key(String),
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        if value == GLOBAL {
            Scope::Global
        } else {
            Scope::Key(value.to_string())
        }
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        if value == GLOBAL {
            Scope::Global
        } else {
            Scope::Key(value)
        }
    }
}

impl From<&String> for Scope {
    fn from(value: &String) -> Self {
        Scope::from(value.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str(GLOBAL),
            Scope::Key(key) => f.write_str(key),
        }
    }
}

/// A single injection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletRule {
    /// Key whose resolved object is injected.
    pub source: String,
    /// Instances the rule applies to.
    pub target: Scope,
    /// Property that receives the object.
    pub property: String,
}

/// Outlet rules grouped by scope.
#[derive(Debug, Default)]
pub(crate) struct OutletTable {
    rules: HashMap<Scope, Vec<OutletRule>>,
}

impl OutletTable {
    pub(crate) fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds a rule, replacing the source of an existing rule for the same
    /// (target, property). Returns the replaced source, if any.
    pub(crate) fn insert(&mut self, rule: OutletRule) -> Option<String> {
        let rules = self.rules.entry(rule.target.clone()).or_default();
        match rules.iter_mut().find(|r| r.property == rule.property) {
            Some(existing) => Some(core::mem::replace(&mut existing.source, rule.source)),
            None => {
                rules.push(rule);
                None
            }
        }
    }

    /// Removes the rule for (target, property). Returns `true` if one existed.
    pub(crate) fn remove(&mut self, target: &Scope, property: &str) -> bool {
        let Some(rules) = self.rules.get_mut(target) else {
            return false;
        };
        let before = rules.len();
        rules.retain(|r| r.property != property);
        let removed = rules.len() != before;
        if rules.is_empty() {
            self.rules.remove(target);
        }
        removed
    }

    pub(crate) fn contains(&self, target: &Scope, property: &str) -> bool {
        self.rules
            .get(target)
            .is_some_and(|rules| rules.iter().any(|r| r.property == property))
    }

    /// Rules that apply to instances of `key`: global first, then the key's
    /// own, in insertion order.
    pub(crate) fn rules_for(&self, key: &str) -> Vec<OutletRule> {
        let global = self.rules.get(&Scope::Global).into_iter().flatten();
        let scoped = self
            .rules
            .get(&Scope::Key(key.to_string()))
            .into_iter()
            .flatten();
        global.chain(scoped).cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}
