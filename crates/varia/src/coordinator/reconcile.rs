//! Variation reconciliation: align the stored variation records with the
//! current option set (match, synthesize, orphan-delete).

use crate::{
    config::DefaultAttributes,
    coordinator::VariationCoordinator,
    error::{ConfigError, Error},
    obs::VariationTraceEvent,
    query::Query,
    record::{Record, VariationHost},
    relation::RelationDef,
    store::RecordStore,
    value::loose_eq,
};

impl<O, S> VariationCoordinator<O, S>
where
    O: VariationHost,
    S: RecordStore,
{
    /// Fetch the current option records, applying the configured filter.
    pub(crate) fn find_option_models(&self, store: &S) -> Result<Vec<S::Record>, Error> {
        let mut query = Query::new();
        if let Some(filter) = &self.config.option_query_filter {
            filter.apply(&mut query);
        }
        Ok(store.find_all(&self.config.option_entity, &query)?)
    }

    /// Adjust the stored variation records to the option set.
    ///
    /// Options are walked in query order; the first stored record whose
    /// option reference loosely matches the option key is carried over,
    /// a missing record is synthesized with its references and default
    /// attributes set, and every stored record left unconfirmed is
    /// deleted from storage before the result is exposed. The output has
    /// exactly one record per option, in option order.
    pub(crate) fn adjust(
        &self,
        owner: &O,
        store: &mut S,
        relation: &RelationDef,
        existing: Vec<S::Record>,
    ) -> Result<Vec<S::Record>, Error> {
        let options = self.find_option_models(store)?;
        let option_reference_attribute = &self.config.option_reference_attribute;
        let Some(owner_reference_attribute) = relation.owner_reference_attribute() else {
            return Err(ConfigError::MissingRelationLink {
                entity: relation.entity().to_string(),
            }
            .into());
        };

        let mut slots: Vec<Option<S::Record>> = existing.into_iter().map(Some).collect();
        let mut adjusted = Vec::with_capacity(options.len());
        let mut matched: u64 = 0;
        let mut created: u64 = 0;

        for option in &options {
            let option_pk = option.primary_key();
            let confirmed = slots.iter().position(|slot| {
                slot.as_ref().is_some_and(|model| {
                    let reference = model
                        .get_attribute(option_reference_attribute)
                        .unwrap_or_default();
                    loose_eq(&reference, &option_pk)
                })
            });
            if let Some(index) = confirmed {
                if let Some(model) = slots[index].take() {
                    adjusted.push(model);
                    matched += 1;
                }
            } else {
                let mut model = store.new_record(relation.entity())?;
                model.set_attribute(option_reference_attribute, option_pk);
                model.set_attribute(owner_reference_attribute, owner.primary_key());
                self.fill_defaults(&mut model, relation);
                adjusted.push(model);
                created += 1;
            }
        }

        let mut orphaned: u64 = 0;
        for orphan in slots.into_iter().flatten() {
            store.delete(&orphan)?;
            orphaned += 1;
            self.emit_with(|| VariationTraceEvent::OrphanDeleted {
                entity: relation.entity().to_string(),
                option_reference: orphan
                    .get_attribute(option_reference_attribute)
                    .unwrap_or_default(),
            });
        }

        self.emit_with(|| VariationTraceEvent::Reconciled {
            entity: relation.entity().to_string(),
            options: options.len() as u64,
            matched,
            created,
            orphaned,
        });

        Ok(adjusted)
    }

    /// Apply default attribute values to a newly synthesized variation.
    ///
    /// The configured source wins; without one, the relation's declared
    /// equality where-clause is copied onto matching attributes so
    /// definitions like `has_many(..).and_where("type", "x")` propagate
    /// `type = "x"` automatically.
    fn fill_defaults(&self, model: &mut S::Record, relation: &RelationDef) {
        match &self.config.default_attributes {
            None => {
                for (attribute, value) in relation.where_clause() {
                    if model.has_attribute(attribute) {
                        model.set_attribute(attribute, value.clone());
                    }
                }
            }
            Some(DefaultAttributes::Map(attributes)) => {
                for (attribute, value) in attributes {
                    model.set_attribute(attribute, value.clone());
                }
            }
            Some(DefaultAttributes::Callback(callback)) => callback(model),
        }
    }
}
