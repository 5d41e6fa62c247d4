use crate::value::{Value, loose_eq};
use std::fmt;

///
/// Query
///
/// Declarative equality filter handed to the record store. The store is
/// free to compile this into whatever its backend speaks; matching here
/// is only used by in-memory implementations and always goes through the
/// loose key comparator.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    conditions: Vec<(String, Value)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an equality condition.
    pub fn and_where(&mut self, attribute: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.conditions.push((attribute.into(), value.into()));
        self
    }

    pub fn and_where_all(&mut self, conditions: &[(String, Value)]) -> &mut Self {
        for (attribute, value) in conditions {
            self.conditions.push((attribute.clone(), value.clone()));
        }
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Whether a row satisfies every condition, reading attributes
    /// through the given accessor. Missing attributes never match.
    pub fn matches(&self, get: impl Fn(&str) -> Option<Value>) -> bool {
        self.conditions.iter().all(|(attribute, expected)| {
            get(attribute).is_some_and(|actual| loose_eq(&actual, expected))
        })
    }
}

///
/// QueryFilter
///
/// Callable-or-literal narrowing applied to the option query: either a
/// direct set of equality conditions, or a callback that refines the
/// query in place.
///

pub enum QueryFilter {
    Condition(Vec<(String, Value)>),
    Callback(Box<dyn Fn(&mut Query)>),
}

impl QueryFilter {
    /// Convenience constructor for a single equality condition.
    #[must_use]
    pub fn condition(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Condition(vec![(attribute.into(), value.into())])
    }

    pub fn apply(&self, query: &mut Query) {
        match self {
            Self::Condition(conditions) => {
                query.and_where_all(conditions);
            }
            Self::Callback(callback) => callback(query),
        }
    }
}

impl fmt::Debug for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition(conditions) => f.debug_tuple("Condition").field(conditions).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
