use crate::{error::StoreError, query::Query, record::Record};

///
/// RecordStore
///
/// Narrow persistence seam the variation runtime drives. Transactions,
/// key generation, and query compilation all live behind it; failures
/// propagate to the caller untouched.
///

pub trait RecordStore {
    type Record: Record;

    /// Instantiate a fresh, unsaved record of the given entity.
    fn new_record(&self, entity: &str) -> Result<Self::Record, StoreError>;

    fn find_all(&self, entity: &str, query: &Query) -> Result<Vec<Self::Record>, StoreError>;

    fn find_one(&self, entity: &str, query: &Query) -> Result<Option<Self::Record>, StoreError> {
        Ok(self.find_all(entity, query)?.into_iter().next())
    }

    /// Persist the record, inserting or updating as appropriate.
    /// `validate` false skips the record's own validation rules.
    fn save(&mut self, record: &mut Self::Record, validate: bool) -> Result<bool, StoreError>;

    fn delete(&mut self, record: &Self::Record) -> Result<bool, StoreError>;
}
