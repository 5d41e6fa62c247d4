use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level failure surface. Configuration faults are fatal to the
/// caller; unknown-attribute faults are expected and meant to be caught
/// by generic reflection layers that fall through to their own handling;
/// store faults propagate unchanged from the persistence collaborator.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub(crate) fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    #[must_use]
    pub const fn is_unknown_attribute(&self) -> bool {
        matches!(self, Self::UnknownAttribute { .. })
    }
}

///
/// ConfigError
///
/// Invalid variation configuration. Surfaced immediately; never retried.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("`default_option_reference` must be set")]
    MissingDefaultOptionReference,

    #[error("owner declares no relation named '{name}'")]
    UnknownRelation { name: String },

    #[error("relation to '{entity}' declares no link")]
    MissingRelationLink { entity: String },

    #[error("owner has no attribute '{name}' named by the default value map")]
    UnknownOwnerAttribute { name: String },
}

///
/// StoreError
///
/// Failure reported by the record store. The variation runtime never
/// catches or retries these; partial application is possible and
/// rollback is the responsibility of whatever wraps the save call.
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("unknown entity: {entity}")]
    UnknownEntity { entity: String },

    #[error("record not found: {entity}[{key}]")]
    NotFound { entity: String, key: String },

    #[error("storage backend failure: {message}")]
    Backend { message: String },
}
