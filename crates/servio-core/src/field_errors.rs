//! Per-field validation messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which messages that do not belong to a single input are stored.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Mapping of form field name to the messages shown next to that field.
///
/// Messages are kept verbatim and in insertion order per field; fields are
/// ordered by name so summaries are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Appends a message that is not tied to a specific field.
    pub fn add_general(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages for `field`, empty if the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Aggregated one-line message shown above the form.
    ///
    /// General messages come first, then one `Label: message` entry per field
    /// message.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self.get(NON_FIELD_ERRORS).to_vec();

        for (field, messages) in self.iter().filter(|(f, _)| *f != NON_FIELD_ERRORS) {
            let label = field_label(field);
            parts.extend(messages.iter().map(|m| format!("{label}: {m}")));
        }

        parts.join("; ")
    }

    /// `Ok(())` when no messages were collected, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map.into_iter().filter(|(_, v)| !v.is_empty()).collect())
    }
}

/// `confirm_password` -> `Confirm password`
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
