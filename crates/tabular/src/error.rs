use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// Input was neither an object nor a JSON string
    #[error("expected an aggregation result as an object or JSON string, you provided {0}")]
    InvalidKind(&'static str),

    #[error("expected exactly one aggregation, found {0}")]
    AggregationCount(usize),

    #[error("aggregation '{agg}' is missing field '{field}'")]
    MissingField { agg: String, field: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
