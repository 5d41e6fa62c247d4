//! Observability: trace sink for reconciliation and lifecycle activity.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! runtime semantics.

use crate::value::Value;

///
/// VariationTraceSink
///

pub trait VariationTraceSink: Send + Sync {
    fn on_event(&self, event: VariationTraceEvent);
}

///
/// VariationTraceEvent
///

#[derive(Clone, Debug, PartialEq)]
pub enum VariationTraceEvent {
    /// A full variation set was materialized for an owner.
    Reconciled {
        entity: String,
        options: u64,
        matched: u64,
        created: u64,
        orphaned: u64,
    },
    /// A stored record whose option no longer exists was removed.
    OrphanDeleted {
        entity: String,
        option_reference: Value,
    },
    Saved {
        entity: String,
        option_reference: Value,
    },
    /// The save filter rejected a record that was never persisted.
    SkippedByFilter {
        entity: String,
        option_reference: Value,
    },
    /// The save filter rejected a previously persisted record.
    DeletedByFilter {
        entity: String,
        option_reference: Value,
    },
    ValidationFailed {
        option_reference: Value,
        attributes: u64,
    },
}
