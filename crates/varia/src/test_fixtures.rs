//! Shared test fixtures: an attribute-map record, an in-memory record
//! store with delete tracking, and seed data for the item/translation
//! scenarios used across the coordinator tests.

use crate::{
    error::StoreError,
    query::Query,
    record::{Errors, Record, VariationHost},
    relation::RelationDef,
    store::RecordStore,
    value::Value,
};
use std::collections::BTreeMap;

pub(crate) const ITEM: &str = "Item";
pub(crate) const ITEM_TRANSLATION: &str = "ItemTranslation";
pub(crate) const LANGUAGE: &str = "Language";

///
/// TestRecord
///
/// Attribute-map record with required-attribute validation. Declared
/// attributes start as `Null`; `row` is the storage identity assigned on
/// first save.
///

#[derive(Clone, Debug)]
pub(crate) struct TestRecord {
    pub entity: String,
    pub row: Option<u64>,
    pub attributes: BTreeMap<String, Value>,
    pub required: Vec<&'static str>,
    pub errors: Errors,
    pub relations: BTreeMap<String, RelationDef>,
}

impl TestRecord {
    pub fn new(entity: &str, attributes: &[&str]) -> Self {
        Self {
            entity: entity.to_string(),
            row: None,
            attributes: attributes
                .iter()
                .map(|name| ((*name).to_string(), Value::Null))
                .collect(),
            required: Vec::new(),
            errors: Errors::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn add_relation(&mut self, name: &str, relation: RelationDef) {
        self.relations.insert(name.to_string(), relation);
    }
}

impl Record for TestRecord {
    fn primary_key(&self) -> Value {
        self.attributes.get("id").cloned().unwrap_or_default()
    }

    fn is_new(&self) -> bool {
        self.row.is_none()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn validate(&mut self) -> bool {
        self.errors.clear();
        for attribute in &self.required {
            let value = self.attributes.get(*attribute).cloned().unwrap_or_default();
            if value.is_empty() {
                self.errors
                    .add(*attribute, format!("{attribute} cannot be blank"));
            }
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &Errors {
        &self.errors
    }

    fn add_errors(&mut self, errors: &Errors) {
        self.errors.merge(errors);
    }
}

impl VariationHost for TestRecord {
    fn relation(&self, name: &str) -> Option<RelationDef> {
        self.relations.get(name).cloned()
    }
}

///
/// Schema
///

#[derive(Clone, Debug)]
struct Schema {
    attributes: Vec<&'static str>,
    required: Vec<&'static str>,
    auto_key: Option<&'static str>,
}

///
/// StoredRow
///

#[derive(Clone, Debug)]
struct StoredRow {
    entity: String,
    row: u64,
    attributes: BTreeMap<String, Value>,
}

///
/// MemoryStore
///
/// In-memory record store; rows keep insertion order so query results
/// are deterministic. Deletions are recorded for assertions.
///

#[derive(Default)]
pub(crate) struct MemoryStore {
    schemas: BTreeMap<String, Schema>,
    rows: Vec<StoredRow>,
    next_row: u64,
    pub deleted: Vec<(String, u64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_row: 1,
            ..Self::default()
        }
    }

    pub fn define(
        &mut self,
        entity: &str,
        attributes: &[&'static str],
        required: &[&'static str],
        auto_key: Option<&'static str>,
    ) {
        self.schemas.insert(
            entity.to_string(),
            Schema {
                attributes: attributes.to_vec(),
                required: required.to_vec(),
                auto_key,
            },
        );
    }

    /// Seed a row with explicit attribute values.
    pub fn insert(&mut self, entity: &str, pairs: &[(&str, Value)]) -> u64 {
        let row = self.next_row;
        self.next_row += 1;
        let mut attributes: BTreeMap<String, Value> = self
            .schemas
            .get(entity)
            .map(|schema| {
                schema
                    .attributes
                    .iter()
                    .map(|name| ((*name).to_string(), Value::Null))
                    .collect()
            })
            .unwrap_or_default();
        for (name, value) in pairs {
            attributes.insert((*name).to_string(), value.clone());
        }
        self.rows.push(StoredRow {
            entity: entity.to_string(),
            row,
            attributes,
        });
        row
    }

    pub fn count(&self, entity: &str) -> usize {
        self.rows.iter().filter(|row| row.entity == entity).count()
    }

    fn schema(&self, entity: &str) -> Result<&Schema, StoreError> {
        self.schemas
            .get(entity)
            .ok_or_else(|| StoreError::UnknownEntity {
                entity: entity.to_string(),
            })
    }

    fn record_from(&self, schema: &Schema, stored: &StoredRow) -> TestRecord {
        TestRecord {
            entity: stored.entity.clone(),
            row: Some(stored.row),
            attributes: stored.attributes.clone(),
            required: schema.required.clone(),
            errors: Errors::new(),
            relations: BTreeMap::new(),
        }
    }
}

impl RecordStore for MemoryStore {
    type Record = TestRecord;

    fn new_record(&self, entity: &str) -> Result<TestRecord, StoreError> {
        let schema = self.schema(entity)?;
        let mut record = TestRecord::new(entity, &schema.attributes);
        record.required = schema.required.clone();
        Ok(record)
    }

    fn find_all(&self, entity: &str, query: &Query) -> Result<Vec<TestRecord>, StoreError> {
        let schema = self.schema(entity)?;
        Ok(self
            .rows
            .iter()
            .filter(|stored| stored.entity == entity)
            .filter(|stored| query.matches(|name| stored.attributes.get(name).cloned()))
            .map(|stored| self.record_from(schema, stored))
            .collect())
    }

    fn save(&mut self, record: &mut TestRecord, validate: bool) -> Result<bool, StoreError> {
        if validate && !record.validate() {
            return Ok(false);
        }
        match record.row {
            Some(row) => {
                let stored = self
                    .rows
                    .iter_mut()
                    .find(|stored| stored.entity == record.entity && stored.row == row)
                    .ok_or_else(|| StoreError::NotFound {
                        entity: record.entity.clone(),
                        key: row.to_string(),
                    })?;
                stored.attributes = record.attributes.clone();
            }
            None => {
                let row = self.next_row;
                self.next_row += 1;
                let auto_key = self
                    .schemas
                    .get(&record.entity)
                    .and_then(|schema| schema.auto_key);
                if let Some(key) = auto_key {
                    if record.get_attribute(key).unwrap_or_default().is_empty() {
                        record.set_attribute(key, Value::Uint(row));
                    }
                }
                record.row = Some(row);
                self.rows.push(StoredRow {
                    entity: record.entity.clone(),
                    row,
                    attributes: record.attributes.clone(),
                });
            }
        }
        Ok(true)
    }

    fn delete(&mut self, record: &TestRecord) -> Result<bool, StoreError> {
        let Some(row) = record.row else {
            return Ok(false);
        };
        let before = self.rows.len();
        self.rows
            .retain(|stored| !(stored.entity == record.entity && stored.row == row));
        if self.rows.len() == before {
            return Ok(false);
        }
        self.deleted.push((record.entity.clone(), row));
        Ok(true)
    }
}

/// Store seeded with the canonical scenario: two languages, two items,
/// translations for item 1 in both languages and for item 2 in German
/// only.
pub(crate) fn store_with_seed() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.define(LANGUAGE, &["id", "name", "locale"], &[], Some("id"));
    store.define(ITEM, &["id", "name"], &["name"], Some("id"));
    store.define(
        ITEM_TRANSLATION,
        &["itemId", "languageId", "title", "description"],
        &["title", "description", "languageId"],
        None,
    );

    store.insert(
        LANGUAGE,
        &[
            ("id", Value::Uint(1)),
            ("name", Value::from("English")),
            ("locale", Value::from("en")),
        ],
    );
    store.insert(
        LANGUAGE,
        &[
            ("id", Value::Uint(2)),
            ("name", Value::from("German")),
            ("locale", Value::from("de")),
        ],
    );

    store.insert(ITEM, &[("id", Value::Uint(1)), ("name", Value::from("item1"))]);
    store.insert(ITEM, &[("id", Value::Uint(2)), ("name", Value::from("item2"))]);

    store.insert(
        ITEM_TRANSLATION,
        &[
            ("itemId", Value::Uint(1)),
            ("languageId", Value::Uint(1)),
            ("title", Value::from("item1-en")),
            ("description", Value::from("item1-desc-en")),
        ],
    );
    store.insert(
        ITEM_TRANSLATION,
        &[
            ("itemId", Value::Uint(1)),
            ("languageId", Value::Uint(2)),
            ("title", Value::from("item1-de")),
            ("description", Value::from("item1-desc-de")),
        ],
    );
    store.insert(
        ITEM_TRANSLATION,
        &[
            ("itemId", Value::Uint(2)),
            ("languageId", Value::Uint(2)),
            ("title", Value::from("item2-de")),
            ("description", Value::from("item2-desc-de")),
        ],
    );

    store
}

pub(crate) fn attach_item_relations(item: &mut TestRecord) {
    item.add_relation(
        "translations",
        RelationDef::has_many(ITEM_TRANSLATION).link("itemId", "id"),
    );
}

/// Load an item owner by id, with its relations attached.
pub(crate) fn find_item(store: &MemoryStore, id: u64) -> TestRecord {
    let mut query = Query::new();
    query.and_where("id", id);
    let mut item = store
        .find_one(ITEM, &query)
        .expect("item query should succeed")
        .expect("item should exist");
    attach_item_relations(&mut item);
    item
}

/// A fresh, unsaved item owner with its relations attached.
pub(crate) fn new_item(store: &MemoryStore) -> TestRecord {
    let mut item = store.new_record(ITEM).expect("item schema should exist");
    attach_item_relations(&mut item);
    item
}
