use crate::{query::Query, record::Record, value::Value};

///
/// RelationDef
///
/// Declarative descriptor of a relation from an owner record to its
/// variation records. `link` maps variation-side attributes to the owner
/// attributes they reference; the first pair's variation side is the
/// owner-reference (foreign key) attribute. The equality where-clause
/// doubles as the default attribute source for newly synthesized
/// variations.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RelationDef {
    entity: String,
    link: Vec<(String, String)>,
    where_clause: Vec<(String, Value)>,
    multiple: bool,
}

impl RelationDef {
    /// Declare a to-many relation toward the given variation entity.
    #[must_use]
    pub fn has_many(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            link: Vec::new(),
            where_clause: Vec::new(),
            multiple: true,
        }
    }

    /// Append a link pair: variation attribute referencing an owner attribute.
    #[must_use]
    pub fn link(mut self, variation_attribute: impl Into<String>, owner_attribute: impl Into<String>) -> Self {
        self.link
            .push((variation_attribute.into(), owner_attribute.into()));
        self
    }

    /// Refine the relation with an equality condition.
    #[must_use]
    pub fn and_where(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause.push((attribute.into(), value.into()));
        self
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn link_pairs(&self) -> &[(String, String)] {
        &self.link
    }

    #[must_use]
    pub fn where_clause(&self) -> &[(String, Value)] {
        &self.where_clause
    }

    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub const fn set_multiple(&mut self, multiple: bool) {
        self.multiple = multiple;
    }

    /// The variation-side attribute carrying the owner foreign key.
    #[must_use]
    pub fn owner_reference_attribute(&self) -> Option<&str> {
        self.link
            .first()
            .map(|(variation_attribute, _)| variation_attribute.as_str())
    }

    /// Build the concrete query selecting this relation's records for
    /// the given owner: link conditions against the owner's current
    /// attribute values, plus the declared where-clause.
    pub fn query_for(&self, owner: &impl Record) -> Query {
        let mut query = Query::new();
        for (variation_attribute, owner_attribute) in &self.link {
            let value = owner.get_attribute(owner_attribute).unwrap_or_default();
            query.and_where(variation_attribute.clone(), value);
        }
        query.and_where_all(&self.where_clause);
        query
    }
}
