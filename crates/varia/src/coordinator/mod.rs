mod lifecycle;
mod reconcile;
mod resolve;


use crate::{
    config::VariationConfig,
    error::{ConfigError, Error},
    obs::{VariationTraceEvent, VariationTraceSink},
    record::{Record, VariationHost},
    relation::RelationDef,
    store::RecordStore,
    value::{Value, loose_eq},
};

///
/// DefaultSlot
///
/// Memoized resolution state for the default variation. `InSet` aliases
/// an entry of the materialized variation set so writes through the
/// virtual attribute surface land on the record that will be persisted;
/// `Detached` holds a record fetched before the set was materialized.
///

enum DefaultSlot<R> {
    Unresolved,
    Absent,
    Detached(R),
    InSet(usize),
}

///
/// VariationCoordinator
///
/// Per-owner-instance variation runtime: reconciles the stored variation
/// records against the option set, resolves virtual owner attributes
/// through the default variation, and cascades validation and
/// persistence from the owner lifecycle. Stateless apart from the
/// per-instance caches; the owner and store are passed into every
/// operation.
///

pub struct VariationCoordinator<O, S>
where
    O: VariationHost,
    S: RecordStore,
{
    config: VariationConfig<O, S::Record>,
    sink: Option<&'static dyn VariationTraceSink>,
    models: Option<Vec<S::Record>>,
    default_slot: DefaultSlot<S::Record>,
}

impl<O, S> VariationCoordinator<O, S>
where
    O: VariationHost,
    S: RecordStore,
{
    #[must_use]
    pub fn new(config: VariationConfig<O, S::Record>) -> Self {
        Self {
            config,
            sink: None,
            models: None,
            default_slot: DefaultSlot::Unresolved,
        }
    }

    #[must_use]
    pub fn config(&self) -> &VariationConfig<O, S::Record> {
        &self.config
    }

    pub fn set_trace_sink(&mut self, sink: &'static dyn VariationTraceSink) {
        self.sink = Some(sink);
    }

    /// Emit a trace event; the event is only constructed when a sink is
    /// attached.
    pub(crate) fn emit_with(&self, event: impl FnOnce() -> VariationTraceEvent) {
        if let Some(sink) = self.sink {
            sink.on_event(event());
        }
    }

    /// Resolve the configured variations relation off the owner.
    pub(crate) fn variations_relation_def(&self, owner: &O) -> Result<RelationDef, ConfigError> {
        owner
            .relation(&self.config.variations_relation)
            .ok_or_else(|| ConfigError::UnknownRelation {
                name: self.config.variations_relation.clone(),
            })
    }

    /// The default variation's option key, resolved from the configured
    /// literal or callback.
    pub fn default_option_reference(&self, owner: &O) -> Result<Value, ConfigError> {
        self.config.default_option_reference.as_ref().map_or(
            Err(ConfigError::MissingDefaultOptionReference),
            |reference| Ok(reference.resolve(owner)),
        )
    }

    /// Derive the has-one relation selecting the default variation: the
    /// variations relation narrowed to the default option reference.
    pub fn default_variation_relation_def(&self, owner: &O) -> Result<RelationDef, ConfigError> {
        let mut relation = self.variations_relation_def(owner)?;
        relation.set_multiple(false);
        let reference = self.default_option_reference(owner)?;
        Ok(relation.and_where(self.config.option_reference_attribute.clone(), reference))
    }

    /// The authoritative variation set for this owner: one record per
    /// option, in option order. Materialized lazily on first access and
    /// cached; orphaned stored records are deleted as a side effect of
    /// that first materialization.
    pub fn variation_models(&mut self, owner: &O, store: &mut S) -> Result<&[S::Record], Error> {
        Ok(self.materialized(owner, store)?)
    }

    pub fn variation_models_mut(
        &mut self,
        owner: &O,
        store: &mut S,
    ) -> Result<&mut [S::Record], Error> {
        Ok(self.materialized(owner, store)?)
    }

    /// Replace the cached variation set wholesale.
    pub fn set_variation_models(&mut self, models: Vec<S::Record>) -> &mut Self {
        self.models = Some(models);
        // a cached in-set index would dangle against the new set
        if matches!(self.default_slot, DefaultSlot::InSet(_)) {
            self.default_slot = DefaultSlot::Unresolved;
        }
        self
    }

    /// Whether the variation set has been materialized (and is
    /// non-empty). Lifecycle hooks only engage past this gate, so owners
    /// whose variations were never touched stay query-free.
    #[must_use]
    pub fn is_variation_models_initialized(&self) -> bool {
        self.models.as_ref().is_some_and(|models| !models.is_empty())
    }

    /// The variation matching the given option primary key, if any.
    /// Materializes the full set.
    pub fn variation_model(
        &mut self,
        owner: &O,
        store: &mut S,
        option_pk: &Value,
    ) -> Result<Option<&mut S::Record>, Error> {
        let option_reference_attribute = self.config.option_reference_attribute.clone();
        let models = self.materialized(owner, store)?;
        Ok(models.iter_mut().find(|model| {
            let reference = model
                .get_attribute(&option_reference_attribute)
                .unwrap_or_default();
            loose_eq(&reference, option_pk)
        }))
    }

    /// The default variation record, if one exists for the configured
    /// option reference. Resolution is memoized per owner instance.
    pub fn default_variation_model(
        &mut self,
        owner: &O,
        store: &mut S,
    ) -> Result<Option<&S::Record>, Error> {
        self.resolve_default_slot(owner, store)?;
        Ok(match &self.default_slot {
            DefaultSlot::Detached(record) => Some(record),
            DefaultSlot::InSet(index) => self.models.as_ref().and_then(|models| models.get(*index)),
            DefaultSlot::Unresolved | DefaultSlot::Absent => None,
        })
    }

    pub fn default_variation_model_mut(
        &mut self,
        owner: &O,
        store: &mut S,
    ) -> Result<Option<&mut S::Record>, Error> {
        self.resolve_default_slot(owner, store)?;
        Ok(match &mut self.default_slot {
            DefaultSlot::Detached(record) => Some(record),
            DefaultSlot::InSet(index) => {
                let index = *index;
                self.models.as_mut().and_then(|models| models.get_mut(index))
            }
            DefaultSlot::Unresolved | DefaultSlot::Absent => None,
        })
    }

    /// Ensure the variation set cache is populated and return it.
    fn materialized(&mut self, owner: &O, store: &mut S) -> Result<&mut Vec<S::Record>, Error> {
        if self.models.is_none() {
            let relation = self.variations_relation_def(owner)?;
            let existing = store.find_all(relation.entity(), &relation.query_for(owner))?;
            let adjusted = self.adjust(owner, store, &relation, existing)?;
            self.models = Some(adjusted);
        }
        Ok(self.models.get_or_insert_default())
    }

    /// Locate the default variation, mirroring the relation-population
    /// memoization: a resolved slot is reused as-is; with the set
    /// materialized the slot binds into it by index (a miss stays
    /// unresolved so a later set replacement is rescanned); otherwise a
    /// single record is fetched through the derived has-one relation,
    /// caching the negative as well.
    fn resolve_default_slot(&mut self, owner: &O, store: &mut S) -> Result<(), Error> {
        if self.config.default_variation_relation.is_none() {
            self.default_slot = DefaultSlot::Absent;
            return Ok(());
        }
        if !matches!(self.default_slot, DefaultSlot::Unresolved) {
            return Ok(());
        }

        if let Some(models) = &self.models {
            let reference = self.default_option_reference(owner)?;
            let attribute = &self.config.option_reference_attribute;
            if let Some(index) = models.iter().position(|model| {
                let actual = model.get_attribute(attribute).unwrap_or_default();
                loose_eq(&actual, &reference)
            }) {
                self.default_slot = DefaultSlot::InSet(index);
            }
            return Ok(());
        }

        let relation = self.default_variation_relation_def(owner)?;
        let found = store.find_one(relation.entity(), &relation.query_for(owner))?;
        self.default_slot = match found {
            Some(record) => DefaultSlot::Detached(record),
            None => DefaultSlot::Absent,
        };
        Ok(())
    }
}
