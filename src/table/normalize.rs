//! Flattening of classified table elements.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{StatsTable, TableKind, classify_tables};
use crate::html::{selector, stripped_text};

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static HEADER_ROW: LazyLock<Selector> = LazyLock::new(|| selector("thead > tr"));
static TITLE_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th.table__cell.table__th"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody > tr"));
static CAREER_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector("td.table__cell.table-tbody__td"));
static ANY_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Synthetic first column of career tables; the club cell has no header.
const TEAM_TITLE: &str = "Team";

/// Synthetic result column of the current season log and where it goes.
const OUTCOME_TITLE: &str = "Outcome";
const OUTCOME_POSITION: usize = 2;

/// Classifies and normalizes every statistics table in `document`.
#[must_use]
pub fn extract_tables(document: &Html) -> BTreeMap<TableKind, StatsTable> {
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE).collect();
    debug!(found = tables.len(), "located tables");

    classify_tables(tables.len())
        .into_iter()
        .map(|(index, kind)| (kind, normalize_table(tables[index], kind)))
        .collect()
}

/// Flattens one table element according to the layout of `kind`.
///
/// Returns an empty table (and logs why) unless both a title row and
/// rectangular data rows could be read.
#[must_use]
pub fn normalize_table(table: ElementRef<'_>, kind: TableKind) -> StatsTable {
    let titles = column_titles(table, kind);
    let rows = data_rows(table, kind);
    match StatsTable::try_new(kind, titles, rows) {
        Ok(table) => table,
        Err(defect) => {
            warn!(table = %kind, %defect, "failed table extraction");
            StatsTable::empty(kind)
        }
    }
}

/// Undoes the doubled first letter the site renders in result cells.
///
/// Only the exact forms `LLost`, `WWon` and `DDrawn` are rewritten, so the
/// rule is idempotent.
///
/// ```
/// use nrl_scraper_core::table::rewrite_outcome;
///
/// assert_eq!(rewrite_outcome("WWon"), "Won");
/// assert_eq!(rewrite_outcome("Won"), "Won");
/// ```
#[must_use]
pub fn rewrite_outcome(cell: &str) -> &str {
    match cell {
        "LLost" | "WWon" | "DDrawn" => &cell[1..],
        other => other,
    }
}

fn column_titles(table: ElementRef<'_>, kind: TableKind) -> Vec<String> {
    // The last header row holds the column titles; earlier ones are groupings.
    let Some(header) = table.select(&HEADER_ROW).last() else {
        return Vec::new();
    };

    let mut titles: Vec<String> = header
        .select(&TITLE_CELL)
        .filter(|cell| has_raw_text(*cell))
        .map(|cell| stripped_text(cell).replace('\u{a0}', " "))
        .collect();
    if titles.is_empty() {
        return titles;
    }

    if kind.is_career() {
        titles.insert(0, TEAM_TITLE.to_string());
    } else {
        let at = OUTCOME_POSITION.min(titles.len());
        titles.insert(at, OUTCOME_TITLE.to_string());
    }
    titles
}

fn data_rows(table: ElementRef<'_>, kind: TableKind) -> Vec<Vec<String>> {
    table
        .select(&BODY_ROW)
        .map(|row| {
            if kind.is_career() {
                career_row(row)
            } else {
                current_season_row(row)
            }
        })
        .collect()
}

fn career_row(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CAREER_CELL)
        .filter(|cell| has_raw_text(*cell))
        .map(stripped_text)
        // First kept cell is the whitespace-padded club logo.
        .skip(1)
        .collect()
}

fn current_season_row(row: ElementRef<'_>) -> Vec<String> {
    row.select(&ANY_CELL)
        .map(stripped_text)
        .filter(|text| !text.is_empty())
        .map(|cell| rewrite_outcome(&cell).to_string())
        .collect()
}

/// Whether `cell` holds any text at all, whitespace included.
fn has_raw_text(cell: ElementRef<'_>) -> bool {
    cell.text().any(|text| !text.is_empty())
}
