use std::collections::BTreeMap;

use super::Value;

/// Map from field identifier to its current value.
///
/// Keys are kept sorted so that iteration, `Debug` output, and serialized
/// form are deterministic. Updates made during a debug pass go through
/// [`with()`](Self::with), which returns a new map and leaves the original
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct FieldValues {
    data: BTreeMap<String, Value>,
}

impl FieldValues {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, consuming and returning the map.
    #[must_use]
    pub fn set(mut self, field_id: &str, value: impl Into<Value>) -> Self {
        self.insert(field_id, value.into());
        self
    }

    /// Set a field value in place.
    pub fn insert(&mut self, field_id: &str, value: Value) {
        self.data.insert(field_id.to_owned(), value);
    }

    /// Copy of this map with one field overridden.
    #[must_use]
    pub fn with(&self, field_id: &str, value: Value) -> Self {
        let mut next = self.clone();
        next.insert(field_id, value);
        next
    }

    /// Copy of this map with every entry of `overrides` applied on top.
    #[must_use]
    pub fn merged(&self, overrides: &FieldValues) -> Self {
        let mut next = self.clone();
        for (k, v) in &overrides.data {
            next.data.insert(k.clone(), v.clone());
        }
        next
    }

    /// Look up a field. `None` means the field has never been set, which is
    /// distinct from an explicit [`Value::Null`].
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.data.get(field_id)
    }

    #[must_use]
    pub fn contains(&self, field_id: &str) -> bool {
        self.data.contains_key(field_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over `(field_id, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field identifiers in key order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
