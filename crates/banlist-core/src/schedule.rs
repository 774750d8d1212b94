//! Selection of the `current` and `upcoming` snapshot pointers.

use chrono::NaiveDate;

/// Which snapshot dates the pointers should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointers {
    /// Latest date on or before today. `None` if every known list is in the future.
    pub current: Option<NaiveDate>,
    /// Earliest date after today, if any. Never equal to `current`.
    pub upcoming: Option<NaiveDate>,
}

/// Pick pointer targets from the known snapshot dates (any order, duplicates allowed).
///
/// A list dated today is already in effect.
pub fn select_pointers(dates: &[NaiveDate], today: NaiveDate) -> Pointers {
    let current = dates.iter().filter(|d| **d <= today).max().copied();
    let upcoming = dates.iter().filter(|d| **d > today).min().copied();
    Pointers { current, upcoming }
}
