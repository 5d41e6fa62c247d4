use crate::{query::QueryFilter, value::Value};

///
/// OptionReference
///
/// Source of the default variation's option key: a literal value, or a
/// callback computed over the owner.
///

pub enum OptionReference<O> {
    Literal(Value),
    Callback(Box<dyn Fn(&O) -> Value>),
}

impl<O> OptionReference<O> {
    pub fn resolve(&self, owner: &O) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Callback(callback) => callback(owner),
        }
    }
}

///
/// DefaultAttributes
///
/// Attribute values applied to newly synthesized variation records:
/// either a fixed attribute/value mapping, or a callback that mutates
/// the fresh record directly.
///

pub enum DefaultAttributes<R> {
    Map(Vec<(String, Value)>),
    Callback(Box<dyn Fn(&mut R)>),
}

///
/// ValueSource
///
/// Per-attribute default used when the default variation is missing or
/// holds an empty value. `OwnerAttribute` reads the named attribute off
/// the owner at resolution time.
///

pub enum ValueSource<O> {
    Null,
    OwnerAttribute(String),
    Callback(Box<dyn Fn(&O) -> Value>),
}

/// Predicate deciding whether a variation record is persisted or
/// deleted at save time.
pub type SaveFilter<R> = Box<dyn Fn(&R) -> bool>;

///
/// VariationConfig
///
/// Full configuration surface of the variation runtime. Callable-or-
/// literal fields are tagged enums, so invalid source types are
/// unrepresentable; the remaining dynamic faults are unresolvable names
/// and a missing default option reference.
///

pub struct VariationConfig<O, R> {
    pub(crate) variations_relation: String,
    pub(crate) default_variation_relation: Option<String>,
    pub(crate) option_reference_attribute: String,
    pub(crate) option_entity: String,
    pub(crate) option_query_filter: Option<QueryFilter>,
    pub(crate) default_option_reference: Option<OptionReference<O>>,
    pub(crate) default_attributes: Option<DefaultAttributes<R>>,
    pub(crate) attribute_defaults: Vec<(String, ValueSource<O>)>,
    pub(crate) save_filter: Option<SaveFilter<R>>,
}

impl<O, R> VariationConfig<O, R> {
    /// Minimal configuration: the owner relation holding all variations
    /// and the entity enumerating the options.
    #[must_use]
    pub fn new(variations_relation: impl Into<String>, option_entity: impl Into<String>) -> Self {
        Self {
            variations_relation: variations_relation.into(),
            default_variation_relation: None,
            option_reference_attribute: "optionId".to_string(),
            option_entity: option_entity.into(),
            option_query_filter: None,
            default_option_reference: None,
            default_attributes: None,
            attribute_defaults: Vec::new(),
            save_filter: None,
        }
    }

    /// Name of the derived has-one relation caching the default variation.
    /// Virtual attribute resolution only engages when this is set.
    #[must_use]
    pub fn with_default_variation_relation(mut self, name: impl Into<String>) -> Self {
        self.default_variation_relation = Some(name.into());
        self
    }

    /// Variation-side attribute storing the option primary key.
    #[must_use]
    pub fn with_option_reference_attribute(mut self, name: impl Into<String>) -> Self {
        self.option_reference_attribute = name.into();
        self
    }

    /// Narrow the option query with a literal condition or a callback.
    #[must_use]
    pub fn with_option_query_filter(mut self, filter: QueryFilter) -> Self {
        self.option_query_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_default_option_reference(mut self, reference: impl Into<Value>) -> Self {
        self.default_option_reference = Some(OptionReference::Literal(reference.into()));
        self
    }

    #[must_use]
    pub fn with_default_option_reference_fn(
        mut self,
        callback: impl Fn(&O) -> Value + 'static,
    ) -> Self {
        self.default_option_reference = Some(OptionReference::Callback(Box::new(callback)));
        self
    }

    /// Fixed attribute values applied to newly synthesized variations.
    #[must_use]
    pub fn with_default_attributes<K, V>(
        mut self,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.default_attributes = Some(DefaultAttributes::Map(
            attributes
                .into_iter()
                .map(|(attribute, value)| (attribute.into(), value.into()))
                .collect(),
        ));
        self
    }

    /// Callback applied to each newly synthesized variation.
    #[must_use]
    pub fn with_default_attributes_fn(mut self, callback: impl Fn(&mut R) + 'static) -> Self {
        self.default_attributes = Some(DefaultAttributes::Callback(Box::new(callback)));
        self
    }

    /// Register a virtual-attribute default, consulted when the default
    /// variation is absent or its value is empty.
    #[must_use]
    pub fn with_attribute_default(mut self, name: impl Into<String>, source: ValueSource<O>) -> Self {
        self.attribute_defaults.push((name.into(), source));
        self
    }

    #[must_use]
    pub fn with_save_filter(mut self, filter: impl Fn(&R) -> bool + 'static) -> Self {
        self.save_filter = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn variations_relation(&self) -> &str {
        &self.variations_relation
    }

    #[must_use]
    pub fn option_reference_attribute(&self) -> &str {
        &self.option_reference_attribute
    }

    #[must_use]
    pub fn option_entity(&self) -> &str {
        &self.option_entity
    }

    pub(crate) fn attribute_default(&self, name: &str) -> Option<&ValueSource<O>> {
        self.attribute_defaults
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, source)| source)
    }

    pub(crate) fn has_attribute_default(&self, name: &str) -> bool {
        self.attribute_defaults
            .iter()
            .any(|(attribute, _)| attribute == name)
    }
}
