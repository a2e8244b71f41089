//! Name matching for diary search.
//!
//! Search is a containment match on `name` that ignores case and diacritics, so
//! `"la"` finds `"Laphroaig"` and `"cote"` finds `"Côte-Rôtie"`. Both sides are folded
//! the same way: canonical decomposition (NFD), combining marks dropped, then lowercased.
//!
//! The SQLite store registers [`fold`] as a SQL function so the filter runs inside the
//! query; the in-memory store calls [`name_matches`] directly.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether an entry name matches an already folded, non-empty term.
///
/// Entries without a name never match.
pub fn name_matches(name: Option<&str>, folded_term: &str) -> bool {
    match name {
        Some(name) => fold(name).contains(folded_term),
        None => false,
    }
}
