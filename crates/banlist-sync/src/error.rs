use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    Server {
        url: String,
        status: u16,
        body: String,
    },

    #[error("JSON parse error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but does not have the expected shape. Maps to a
    /// distinct process exit code.
    #[error("unexpected payload from {source_id}: {detail}")]
    Shape {
        source_id: &'static str,
        detail: String,
        exit_code: u8,
    },

    #[error("parse error in {context}: {detail}")]
    Parse { context: String, detail: String },

    #[error("{source_id} needs a reference card database")]
    MissingCards { source_id: &'static str },

    #[error(transparent)]
    Store(#[from] banlist_store::StoreError),

    #[error(transparent)]
    Core(#[from] banlist_core::CoreError),
}

impl SyncError {
    pub fn parse(context: impl Into<String>, detail: impl Into<String>) -> Self {
        SyncError::Parse {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        SyncError::Json {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Shape { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }
}
