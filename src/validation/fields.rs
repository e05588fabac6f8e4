//! Per-field error messages shared by local validation and backend responses.

#[cfg(test)]
#[path = "fields_test.rs"]
mod fields_test;

use std::collections::BTreeMap;

use serde_json::Value;

/// Field name to message map. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<String, String>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for `field`, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(field.into(), message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Drop the message for `field`, e.g. when the user edits it.
    pub fn clear_field(&mut self, field: &str) {
        self.entries.remove(field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; entries in `other` win.
    pub fn merge(&mut self, other: FieldErrors) {
        self.entries.extend(other.entries);
    }

    /// Extract field-keyed errors from a backend error body.
    ///
    /// Accepts `{"field": "msg"}` and `{"field": ["msg", ...]}`; list values
    /// are joined with a space. Non-object bodies yield no entries.
    #[must_use]
    pub fn from_server_body(body: &Value) -> Self {
        let mut errors = Self::new();
        let Some(map) = body.as_object() else {
            return errors;
        };
        for (field, value) in map {
            let message = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => continue,
            };
            if !message.is_empty() {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }

    /// Keep only the listed fields.
    #[must_use]
    pub fn only(mut self, fields: &[&str]) -> Self {
        self.entries.retain(|k, _| fields.contains(&k.as_str()));
        self
    }
}
