use crate::{relation::RelationDef, value::Value};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeMap;

///
/// Record
///
/// Narrow persistence-facing view of a stored row. Both owners and
/// variation records implement this; the runtime only ever touches
/// attributes, identity, and validation through it.
///

pub trait Record {
    /// Primary key value; `Value::Null` until the store assigns one.
    fn primary_key(&self) -> Value;

    /// Whether the record has never been persisted.
    fn is_new(&self) -> bool;

    fn has_attribute(&self, name: &str) -> bool;

    fn get_attribute(&self, name: &str) -> Option<Value>;

    fn set_attribute(&mut self, name: &str, value: Value);

    /// Run the record's own validation rules, repopulating `errors`.
    /// Returns whether the record is valid.
    fn validate(&mut self) -> bool;

    fn errors(&self) -> &Errors;

    /// Merge foreign validation errors into this record's collection.
    fn add_errors(&mut self, errors: &Errors);
}

///
/// VariationHost
///
/// Owner-side contract: a record that additionally declares named
/// relations toward its variation records. The runtime resolves the
/// configured relation name through this seam instead of reflecting
/// over the host object system.
///

pub trait VariationHost: Record {
    fn relation(&self, name: &str) -> Option<RelationDef>;
}

///
/// Errors
///
/// Per-attribute validation messages. Merging is additive so a failing
/// variation never masks another's messages.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq, Eq)]
pub struct Errors {
    #[into_iterator(owned, ref)]
    map: BTreeMap<String, Vec<String>>,
}

impl Errors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.map
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: &Self) {
        for (attribute, messages) in &other.map {
            self.map
                .entry(attribute.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    #[must_use]
    pub fn messages(&self, attribute: &str) -> &[String] {
        self.map.get(attribute).map_or(&[], Vec::as_slice)
    }
}
