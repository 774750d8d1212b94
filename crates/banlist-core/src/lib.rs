//! Core types for banlist: reference card database, per-locale name index,
//! name resolution and dated regulation snapshots.

pub mod card;
pub mod dates;
mod error;
pub mod index;
pub mod normalize;
pub mod regulation;
pub mod resolve;
pub mod ruby;
pub mod schedule;
pub mod snapshot;

pub use card::{CardDatabase, CardRecord, LocalizedNames};
pub use error::CoreError;
pub use index::{Locale, NameIndex};
pub use regulation::{CardKey, Level, Regulation, Sections};
pub use resolve::{Matching, Resolver};
pub use schedule::{Pointers, select_pointers};
pub use snapshot::{Snapshot, vector_file_name};
