//! One adapter per regulatory source.

pub mod asia;
pub mod genesys;
pub mod hk;
pub mod master_duel;
pub mod sc;

pub use asia::{AsiaEnglish, AsiaNames};
pub use genesys::Genesys;
pub use hk::{Format, HongKong, Region};
pub use master_duel::MasterDuel;
pub use sc::SimplifiedChinese;
