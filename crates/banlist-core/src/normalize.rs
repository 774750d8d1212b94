//! Display-name normalisation applied before index lookup.
//!
//! Regulatory sites and the reference database are maintained independently
//! and disagree on glyph choice:
//!
//! - Japanese lists use halfwidth ASCII punctuation and the halfwidth middle
//!   dot `･`; the database uses fullwidth forms and `・`.
//! - The database writes The Tyrant Neptune with ideographic spaces while every
//!   other name uses ASCII spaces, so Japanese lookups retry with U+3000.
//! - Simplified Chinese lists mix `･`, `·` and `・`, use ASCII `-` where the
//!   database has `－`, and occasionally contain non-breaking spaces.
//! - English lists occasionally append a clarifier such as
//!   `Amazoness Archer (Updated from: Amazon Archer)`.

/// Offset between an ASCII printable character and its fullwidth form.
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// Historical English names that have since been reprinted under a new name.
pub const ENGLISH_ALIASES: &[(&str, &str)] = &[("Amazon Archer", "Amazoness Archer")];

/// Convert halfwidth ASCII `!`..=`~` and `･` to their fullwidth forms.
///
/// Spaces are left alone. Idempotent: fullwidth input is returned unchanged.
pub fn to_fullwidth(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '･' => '・',
            '!'..='~' => char::from_u32(c as u32 + FULLWIDTH_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Replace ASCII spaces with ideographic spaces (U+3000).
pub fn ideographic_spaces(s: &str) -> String {
    s.replace(' ', "\u{3000}")
}

/// Normalise middle dots, hyphens and non-breaking spaces in Simplified Chinese names.
pub fn simplified_chinese(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '･' | '·' => '・',
            '-' => '－',
            '\u{a0}' => ' ',
            _ => c,
        })
        .collect()
}

/// Convert fullwidth angle brackets to ASCII, as Master Duel writes `＜` for `<`.
pub fn ascii_brackets(s: &str) -> String {
    s.replace('＜', "<").replace('＞', ">")
}

/// Drop a trailing parenthetical clarifier: `"Name (Updated from: Old)"` → `"Name"`.
pub fn strip_clarifier(s: &str) -> &str {
    match s.find(" (") {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Map a historical English name to its current one.
pub fn english_alias(s: &str) -> &str {
    ENGLISH_ALIASES
        .iter()
        .find(|(old, _)| *old == s)
        .map(|(_, new)| *new)
        .unwrap_or(s)
}
