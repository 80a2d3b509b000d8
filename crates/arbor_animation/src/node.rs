use crate::key::Key;

/// One animation channel: the keys driving a single target node, matched to
/// the hierarchy by name.
///
/// Keys are kept sorted by time. Keys with equal times keep their insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    keys: Vec<Key>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: Vec::new(),
        }
    }

    /// Builds a channel from unordered keys.
    #[must_use]
    pub fn with_keys(name: &str, mut keys: Vec<Key>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            name: name.to_string(),
            keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Inserts `key` after every existing key with a time not greater than
    /// its own.
    pub fn add_key(&mut self, key: Key) {
        let index = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(index, key);
    }
}
