//! Parameter model shared by every transport
//!
//! A [`Params`] set is produced once per request by an Input role and handed
//! by value to the Data role. There is no mutating API: once built, entries
//! never change.

use serde::Serialize;
use std::collections::BTreeMap;

/// Flat string-to-string request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    /// An empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// A parameter set holding exactly one entry
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        [(key, value)].into_iter().collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when the key is missing or empty
    pub fn get_non_empty<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }
}

/// Keys stay unique: the first occurrence of a key wins, matching how a
/// repeated query parameter resolves to its first value.
impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in iter {
            entries.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { entries }
    }
}

impl From<std::collections::HashMap<String, String>> for Params {
    fn from(map: std::collections::HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
