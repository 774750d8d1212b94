//! Source adapters: fetch each official list, parse it structurally and
//! publish snapshots through the shared pipeline.

mod error;
pub mod http;
pub mod pipeline;
pub mod source;
pub mod sources;

pub use error::SyncError;
pub use http::{DEFAULT_TIMEOUT, FetchClient};
pub use pipeline::{RunReport, run};
pub use source::{DatedList, ExtractContext, Extraction, ListBody, Publication, Source};
