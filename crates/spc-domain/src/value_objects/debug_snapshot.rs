//! Debug snapshot recorded for every constructed container

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label → value description of the configuration a container was built from
///
/// Labels are kept sorted so two snapshots render identically whenever their
/// contents are equal. Operators compare snapshots of cached containers to
/// spot configuration drift that defeats the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugSnapshot {
    entries: BTreeMap<String, String>,
}

impl DebugSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing any previous value for the label
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(label.into(), value.into());
    }

    /// Value recorded for a label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Iterate over entries in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no labels were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels whose values differ between the two snapshots
    ///
    /// A label present on only one side counts as a difference.
    pub fn diff<'a>(&'a self, other: &'a DebugSnapshot) -> Vec<&'a str> {
        let mut labels: Vec<&str> = self
            .entries
            .iter()
            .filter(|(label, value)| other.entries.get(*label) != Some(*value))
            .map(|(label, _)| label.as_str())
            .collect();

        labels.extend(
            other
                .entries
                .keys()
                .filter(|label| !self.entries.contains_key(*label))
                .map(String::as_str),
        );
        labels.sort_unstable();
        labels
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DebugSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
