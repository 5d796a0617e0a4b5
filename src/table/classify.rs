//! Position-based table classification.

use super::TableKind;

/// Table identities in page order, for the most complete layout.
const LAYOUT: [TableKind; 3] = [
    TableKind::CurrentSeason,
    TableKind::CareerSeason,
    TableKind::CareerOverall,
];

/// Assigns identities to the last (up to three) of `count` tables.
///
/// Returns `(document index, kind)` pairs in document order. With one table
/// it is the career summary; with two, the season breakdown precedes it; with
/// three or more, the current season log precedes those. Tables before the
/// last three are not statistics tables and are ignored.
///
/// ```
/// use nrl_scraper_core::table::{TableKind, classify_tables};
///
/// assert_eq!(classify_tables(1), vec![(0, TableKind::CareerOverall)]);
/// assert_eq!(
///     classify_tables(4),
///     vec![
///         (1, TableKind::CurrentSeason),
///         (2, TableKind::CareerSeason),
///         (3, TableKind::CareerOverall),
///     ]
/// );
/// ```
#[must_use]
pub fn classify_tables(count: usize) -> Vec<(usize, TableKind)> {
    let used = count.min(LAYOUT.len());
    let first = count - used;
    LAYOUT[LAYOUT.len() - used..]
        .iter()
        .enumerate()
        .map(|(offset, kind)| (first + offset, *kind))
        .collect()
}
