//! Registration-ordered entry lists keyed by event name.

use hashbrown::HashMap;

/// A registered entry with a table-unique id.
#[derive(Clone)]
pub(crate) struct Entry<T> {
    pub(crate) id: u64,
    pub(crate) item: T,
    pub(crate) one_shot: bool,
}

/// Per-event entry lists. Entries keep registration order.
pub(crate) struct EventTable<T> {
    events: HashMap<String, Vec<Entry<T>>>,
    next_id: u64,
}

impl<T> Default for EventTable<T> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone + PartialEq> EventTable<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its id.
    pub(crate) fn insert(&mut self, event: &str, item: T, one_shot: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events
            .entry(event.to_string())
            .or_default()
            .push(Entry { id, item, one_shot });
        id
    }

    /// Removes every entry equal to `item`. Returns `true` if any were
    /// removed.
    pub(crate) fn remove(&mut self, event: &str, item: &T) -> bool {
        let Some(entries) = self.events.get_mut(event) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.item != *item);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.events.remove(event);
        }
        removed
    }

    pub(crate) fn contains(&self, event: &str, item: &T) -> bool {
        self.events
            .get(event)
            .is_some_and(|entries| entries.iter().any(|entry| entry.item == *item))
    }

    /// Copies the entries for `event` in registration order.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Entry<T>> {
        self.events.get(event).cloned().unwrap_or_default()
    }

    /// Returns `true` if the entry is still registered.
    pub(crate) fn is_live(&self, event: &str, id: u64) -> bool {
        self.events
            .get(event)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id == id))
    }

    /// Removes the entry with `id`. Returns `false` if it was already gone.
    pub(crate) fn claim(&mut self, event: &str, id: u64) -> bool {
        let Some(entries) = self.events.get_mut(event) else {
            return false;
        };
        let Some(index) = entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        entries.remove(index);
        if entries.is_empty() {
            self.events.remove(event);
        }
        true
    }

    /// Number of entries registered for `event`.
    pub(crate) fn count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, Vec::len)
    }

    /// Event names with at least one entry, sorted.
    pub(crate) fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.events.keys().cloned().collect();
        events.sort_unstable();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_keeps_registration_order() {
        let mut table = EventTable::new();
        table.insert("e", "a", false);
        table.insert("e", "b", true);
        table.insert("e", "c", false);

        let items: Vec<_> = table.snapshot("e").into_iter().map(|e| e.item).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
        assert!(table.snapshot("other").is_empty());
    }

    #[test]
    fn claim_succeeds_once() {
        let mut table = EventTable::new();
        let id = table.insert("e", "a", true);

        assert!(table.is_live("e", id));
        assert!(table.claim("e", id));
        assert!(!table.claim("e", id));
        assert!(!table.is_live("e", id));
        assert_eq!(table.count("e"), 0);
        assert!(table.events().is_empty());
    }

    #[test]
    fn remove_drops_all_equal_entries() {
        let mut table = EventTable::new();
        table.insert("e", "a", false);
        table.insert("e", "b", false);
        table.insert("e", "a", true);

        assert!(table.remove("e", &"a"));
        assert!(!table.contains("e", &"a"));
        assert!(table.contains("e", &"b"));
        assert!(!table.remove("e", &"a"));
        assert!(!table.remove("missing", &"a"));
    }

    #[test]
    fn ids_are_unique_across_events() {
        let mut table = EventTable::new();
        let first = table.insert("x", 1, false);
        let second = table.insert("y", 1, false);
        assert_ne!(first, second);
        assert_eq!(table.events(), vec!["x", "y"]);
    }
}
