//! Ordered collections of records keyed by identity

use crate::definition::Record;
use indexmap::IndexMap;

/// A collection of records uniquely keyed by [`Record::key`]
///
/// Insertion order is kept, so set differences come out in the order the
/// caller supplied the records.
#[derive(Debug, Clone)]
pub struct IdentitySet<T: Record> {
    items: IndexMap<T::Key, T>,
}

impl<T: Record> IdentitySet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Build a set, rejecting the first key that occurs twice
    pub fn try_from_vec(items: Vec<T>) -> Result<Self, T::Key> {
        let mut set = Self::new();
        for item in items {
            let key = item.key();
            if set.items.contains_key(&key) {
                return Err(key);
            }
            set.items.insert(key, item);
        }
        Ok(set)
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.key(), item)
    }

    /// Whether a record with this key is present
    pub fn contains(&self, key: &T::Key) -> bool {
        self.items.contains_key(key)
    }

    /// Look up a record by key
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.get(key)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// Records whose key is absent from `other`
    pub fn difference<'a>(&'a self, other: &'a IdentitySet<T>) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |(key, _)| !other.contains(key))
            .map(|(_, item)| item)
    }

    /// Records whose key is also present in `other`
    pub fn intersection<'a>(
        &'a self,
        other: &'a IdentitySet<T>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.items
            .iter()
            .filter(move |(key, _)| other.contains(key))
            .map(|(_, item)| item)
    }

    /// Consume the set and return the records in insertion order
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_values().collect()
    }
}

impl<T: Record> Default for IdentitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> FromIterator<T> for IdentitySet<T> {
    /// Later records replace earlier ones with the same key
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}
