use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Environment handed to a launched executor.
///
/// Stored as an ordered list so that later entries shadow earlier ones; the wire
/// form is a plain JSON array of `{"key": .., "value": ..}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutorEnv(Vec<KeyValue>);

impl ExecutorEnv {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Value for `key`, taking the last entry when the key repeats.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Builder form of [`ExecutorEnv::push`].
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.push(key, value);
        self
    }

    /// Concatenate `other` after `self`; entries from `other` win on lookup.
    pub fn merged(&self, other: &ExecutorEnv) -> ExecutorEnv {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        ExecutorEnv(out)
    }

    /// Collapse shadowed keys into one effective value per key.
    ///
    /// Container specs and `Command::envs` both want one entry per name.
    pub fn effective(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|kv| (kv.key().to_string(), kv.value().to_string()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ExecutorEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| KeyValue::new(k, v)).collect())
    }
}
