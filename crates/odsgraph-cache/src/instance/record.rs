//! A single instance record.

use std::collections::HashMap;

use odsgraph_core::TypedValue;

/// Values held by one instance.
///
/// Schema values are keyed by attribute name. Instance attributes are ad hoc
/// name/value pairs outside the schema; they keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceRecord {
    values: HashMap<String, TypedValue>,
    instance_attributes: Vec<(String, TypedValue)>,
}

impl InstanceRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value of a schema attribute.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    /// Store a schema attribute value, returning the previous one.
    pub fn set_value(&mut self, name: impl Into<String>, value: TypedValue) -> Option<TypedValue> {
        self.values.insert(name.into(), value)
    }

    /// Iterate over the schema values that are set.
    pub fn set_values(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().filter(|(_, v)| v.is_set()).map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the attribute holds a set value.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(TypedValue::is_set)
    }

    /// Move the value stored under `old` to `new`.
    pub fn rekey(&mut self, old: &str, new: &str) {
        if let Some(value) = self.values.remove(old) {
            self.values.insert(new.to_owned(), value);
        }
    }

    /// Drop the value of a schema attribute.
    pub fn remove_value(&mut self, name: &str) -> Option<TypedValue> {
        self.values.remove(name)
    }

    /// Instance attribute names in insertion order.
    pub fn instance_attribute_names(&self) -> impl Iterator<Item = &str> {
        self.instance_attributes.iter().map(|(name, _)| name.as_str())
    }

    /// The value of an instance attribute.
    #[must_use]
    pub fn instance_attribute(&self, name: &str) -> Option<&TypedValue> {
        self.instance_attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Set an instance attribute. An existing entry keeps its position.
    pub fn set_instance_attribute(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        match self.instance_attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.instance_attributes.push((name, value)),
        }
    }

    /// Remove an instance attribute.
    pub fn remove_instance_attribute(&mut self, name: &str) -> Option<TypedValue> {
        let pos = self.instance_attributes.iter().position(|(n, _)| n == name)?;
        Some(self.instance_attributes.remove(pos).1)
    }
}
