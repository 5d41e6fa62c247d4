//! Virtual attribute resolution: get/set and existence checks backed by
//! the default variation, with the configured default-value fallback.

use crate::{
    config::ValueSource,
    coordinator::VariationCoordinator,
    error::{ConfigError, Error},
    record::{Record, VariationHost},
    store::RecordStore,
    value::Value,
};

impl<O, S> VariationCoordinator<O, S>
where
    O: VariationHost,
    S: RecordStore,
{
    /// Read a virtual attribute.
    ///
    /// Resolution order: if the default variation exists and carries the
    /// attribute, its value wins unless it is empty and the default
    /// value map has an entry, in which case the mapped default
    /// overrides. Without a default variation (or the attribute on it),
    /// the mapped default applies; otherwise the name is unknown.
    pub fn get_attribute(
        &mut self,
        owner: &O,
        store: &mut S,
        name: &str,
    ) -> Result<Value, Error> {
        let has_default = self.config.has_attribute_default(name);
        let variation_value = match self.default_variation_model(owner, store)? {
            Some(model) if model.has_attribute(name) => {
                Some(model.get_attribute(name).unwrap_or_default())
            }
            _ => None,
        };

        match variation_value {
            Some(value) => {
                if value.is_empty() && has_default {
                    self.attribute_default_value(owner, name)
                } else {
                    Ok(value)
                }
            }
            None if has_default => self.attribute_default_value(owner, name),
            None => Err(Error::unknown_attribute(name)),
        }
    }

    /// Write a virtual attribute onto the default variation.
    pub fn set_attribute(
        &mut self,
        owner: &O,
        store: &mut S,
        name: &str,
        value: Value,
    ) -> Result<(), Error> {
        if let Some(model) = self.default_variation_model_mut(owner, store)? {
            if model.has_attribute(name) {
                model.set_attribute(name, value);
                return Ok(());
            }
        }
        Err(Error::unknown_attribute(name))
    }

    /// Whether `get_attribute` can resolve the name, without reading it.
    pub fn can_get_attribute(
        &mut self,
        owner: &O,
        store: &mut S,
        name: &str,
    ) -> Result<bool, Error> {
        if self.config.has_attribute_default(name) {
            return Ok(true);
        }
        Ok(self
            .default_variation_model(owner, store)?
            .is_some_and(|model| model.has_attribute(name)))
    }

    /// Whether `set_attribute` can resolve the name. The default value
    /// map is read-only, so it does not make a name settable.
    pub fn can_set_attribute(
        &mut self,
        owner: &O,
        store: &mut S,
        name: &str,
    ) -> Result<bool, Error> {
        Ok(self
            .default_variation_model(owner, store)?
            .is_some_and(|model| model.has_attribute(name)))
    }

    /// Resolve a default value map entry against the owner.
    fn attribute_default_value(&self, owner: &O, name: &str) -> Result<Value, Error> {
        match self.config.attribute_default(name) {
            None => Err(Error::unknown_attribute(name)),
            Some(ValueSource::Null) => Ok(Value::Null),
            Some(ValueSource::OwnerAttribute(attribute)) => owner
                .get_attribute(attribute)
                .ok_or_else(|| {
                    ConfigError::UnknownOwnerAttribute {
                        name: attribute.clone(),
                    }
                    .into()
                }),
            Some(ValueSource::Callback(callback)) => Ok(callback(owner)),
        }
    }
}
