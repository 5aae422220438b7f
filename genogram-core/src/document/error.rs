use thiserror::Error;

/// Problems with what the caller handed us. The layout engine itself never
/// fails; these are raised only by the parsing/validation entry points.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no subjects")]
    NoSubjects,

    #[error("subject {id} has a non-finite coordinate")]
    NonFiniteCoordinate { id: i64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
}
