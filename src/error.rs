use thiserror::Error;

/// Errors raised while joining, querying and colouring climate data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// Records are missing entirely, or boundaries have no matching record
    #[error("climate data mismatch: {0}")]
    DataMismatch(String),

    /// Variable key outside the registry
    #[error("unknown variable '{0}' (expected one of: temperature, ncdd, nhotdays)")]
    UnknownVariable(String),

    /// District has no record, or its record lacks the field
    #[error("no value for field '{field}' in district '{district}'")]
    LookupMiss { district: String, field: String },

    /// No domain was derived for the field (no record carries it)
    #[error("no domain for field '{0}'")]
    EmptyDomain(String),
}

pub type Result<T> = std::result::Result<T, ClimateError>;
