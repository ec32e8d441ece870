//! Raw query-string storage
//!
//! Keeps every pair exactly as it appeared so that keys the explorer does
//! not own survive a read-patch-write cycle byte for byte.

use perfx_core::params::{decode_value, join_pairs};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    /// Raw `(key, value)` pairs in URL order
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    /// Parse a query string, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// Raw (still encoded) value of the first occurrence of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(raw_key, _)| matches_key(raw_key, key))
            .map(|(_, value)| value.as_str())
    }

    /// Set an already-encoded value, replacing the first occurrence in
    /// place and dropping any later duplicates
    pub fn set(&mut self, key: &str, raw_value: String) {
        let mut slot = Some(raw_value);
        self.pairs.retain_mut(|(raw_key, value)| {
            if !matches_key(raw_key, key) {
                return true;
            }
            match slot.take() {
                Some(new_value) => {
                    *value = new_value;
                    true
                }
                None => false,
            }
        });
        if let Some(new_value) = slot {
            self.pairs.push((key.to_string(), new_value));
        }
    }

    /// Remove every occurrence of `key`. Returns true if any was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(raw_key, _)| !matches_key(raw_key, key));
        before != self.pairs.len()
    }

    /// Set `key` when `value` is present, otherwise remove it
    pub fn apply(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize without the leading `?`
    pub fn to_query_string(&self) -> String {
        join_pairs(self.iter())
    }
}

fn matches_key(raw_key: &str, key: &str) -> bool {
    raw_key == key || decode_value(raw_key) == key
}
