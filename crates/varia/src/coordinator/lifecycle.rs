//! Owner lifecycle cascade: validation and persistence of an already
//! materialized variation set. Neither hook forces materialization; an
//! owner whose variations were never touched stays query-free.

use crate::{
    coordinator::VariationCoordinator,
    error::{ConfigError, Error},
    obs::VariationTraceEvent,
    record::{Record, VariationHost},
    store::RecordStore,
};

impl<O, S> VariationCoordinator<O, S>
where
    O: VariationHost,
    S: RecordStore,
{
    /// Post-validate hook: validate every cached variation and merge
    /// failures into the owner's error collection. All variations are
    /// validated even after the first failure. Returns whether every
    /// variation passed.
    pub fn after_validate(&mut self, owner: &mut O) -> bool {
        if !self.is_variation_models_initialized() {
            return true;
        }
        let Some(mut models) = self.models.take() else {
            return true;
        };

        let mut valid = true;
        for model in &mut models {
            if !model.validate() {
                valid = false;
                owner.add_errors(model.errors());
                self.emit_with(|| VariationTraceEvent::ValidationFailed {
                    option_reference: model
                        .get_attribute(&self.config.option_reference_attribute)
                        .unwrap_or_default(),
                    attributes: model.errors().len() as u64,
                });
            }
        }

        self.models = Some(models);
        valid
    }

    /// Post-insert/post-update hook: reassign each cached variation's
    /// owner reference (the owner may have just received a generated
    /// key) and persist it without re-validation, unless the save filter
    /// rejects it — in which case a previously persisted record is
    /// deleted and a new one is simply not inserted.
    pub fn after_save(&mut self, owner: &O, store: &mut S) -> Result<(), Error> {
        if !self.is_variation_models_initialized() {
            return Ok(());
        }
        let relation = self.variations_relation_def(owner)?;
        let Some(owner_reference_attribute) = relation.owner_reference_attribute() else {
            return Err(ConfigError::MissingRelationLink {
                entity: relation.entity().to_string(),
            }
            .into());
        };
        let Some(mut models) = self.models.take() else {
            return Ok(());
        };

        let outcome = self.persist_models(owner, store, &mut models, owner_reference_attribute, relation.entity());
        self.models = Some(models);
        outcome
    }

    fn persist_models(
        &self,
        owner: &O,
        store: &mut S,
        models: &mut [S::Record],
        owner_reference_attribute: &str,
        entity: &str,
    ) -> Result<(), Error> {
        for model in models {
            model.set_attribute(owner_reference_attribute, owner.primary_key());

            let keep = self
                .config
                .save_filter
                .as_ref()
                .is_none_or(|filter| filter(model));

            let option_reference = model
                .get_attribute(&self.config.option_reference_attribute)
                .unwrap_or_default();

            if keep {
                store.save(model, false)?;
                self.emit_with(|| VariationTraceEvent::Saved {
                    entity: entity.to_string(),
                    option_reference,
                });
            } else if model.is_new() {
                self.emit_with(|| VariationTraceEvent::SkippedByFilter {
                    entity: entity.to_string(),
                    option_reference,
                });
            } else {
                store.delete(model)?;
                self.emit_with(|| VariationTraceEvent::DeletedByFilter {
                    entity: entity.to_string(),
                    option_reference,
                });
            }
        }
        Ok(())
    }
}
