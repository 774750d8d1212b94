use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("card database is not valid JSON: {0}")]
    CardDatabase(#[source] serde_json::Error),

    #[error("unrecognised effective date {input:?} (expected {expected})")]
    Date {
        input: String,
        expected: &'static str,
    },

    #[error("snapshot serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}
