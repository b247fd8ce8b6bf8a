//! Fingerprints: the comparable projection of a participant used to detect
//! meaningful change.
//!
//! A fingerprint is a deterministic field-name to rendered-value map. Two
//! fingerprints are equal iff every field is equal; there is no tolerance.
//! Position fields are never included, so movement alone never triggers a
//! change notification.

mod builder;
mod ratings;

pub use builder::*;
pub use ratings::*;

#[cfg(test)]
mod builder_test;

use std::collections::BTreeMap;

/// Placeholder rendered for any absent field.
pub const MISSING: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    fields: BTreeMap<&'static str, String>,
}

impl Fingerprint {
    pub fn set(
        &mut self,
        field: &'static str,
        value: impl Into<String>,
    ) {
        self.fields.insert(field, value.into());
    }

    /// Inserts the value, or the missing-field placeholder when absent.
    pub fn set_opt(
        &mut self,
        field: &'static str,
        value: Option<impl Into<String>>,
    ) {
        match value {
            Some(v) => self.set(field, v),
            None => self.set(field, MISSING),
        }
    }

    pub fn get(
        &self,
        field: &str,
    ) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Field names whose values differ between `self` and `newer`, in
    /// deterministic sorted order. A field present on only one side counts
    /// as changed.
    pub fn diff(
        &self,
        newer: &Fingerprint,
    ) -> Vec<String> {
        let mut changed: Vec<String> = Vec::new();
        for (field, value) in &self.fields {
            if newer.fields.get(field) != Some(value) {
                changed.push((*field).to_string());
            }
        }
        for field in newer.fields.keys() {
            if !self.fields.contains_key(field) {
                changed.push((*field).to_string());
            }
        }
        changed.sort();
        changed.dedup();
        changed
    }
}
