//! Variation runtime for relational records: reconciles per-option
//! variation rows against a fixed option set, resolves virtual owner
//! attributes through a default variation, and cascades validation and
//! persistence through the owner lifecycle hooks.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod obs;
pub mod query;
pub mod record;
pub mod relation;
pub mod store;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or observability surfaces are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::{DefaultAttributes, OptionReference, ValueSource, VariationConfig},
        coordinator::VariationCoordinator,
        query::{Query, QueryFilter},
        record::{Errors, Record, VariationHost},
        relation::RelationDef,
        value::Value,
    };
}
