//! Player statistics tables.
//!
//! Player pages carry one to three statistics tables whose meaning is known
//! only from their position on the page. This module names them
//! ([`TableKind`]), decides which element is which ([`classify_tables`]) and
//! flattens each into a rectangular [`StatsTable`] ([`normalize_table`]).
//!
//! # Maintenance
//!
//! Classification is a positional heuristic tied to the current page layout:
//! the last table is the career summary, the one before it the per-season
//! career breakdown, and the one before that the current season's game log.
//! If the site adds or reorders tables, [`classify_tables`] is the only
//! function that needs to change.

mod classify;
mod normalize;

pub use classify::classify_tables;
pub use normalize::{extract_tables, normalize_table, rewrite_outcome};

use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

/// Identity of a statistics table on a player page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TableKind {
    /// This season's game-by-game log.
    CurrentSeason,
    /// Career totals broken down per season.
    CareerSeason,
    /// Career totals per club.
    CareerOverall,
}

impl TableKind {
    /// Key used in serialized output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentSeason => "currentSeason",
            Self::CareerSeason => "careerSeason",
            Self::CareerOverall => "careerOverall",
        }
    }

    /// Whether this table uses the career column layout.
    #[must_use]
    pub fn is_career(self) -> bool {
        matches!(self, Self::CareerSeason | Self::CareerOverall)
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular table: one title row and zero or more rows of equal width.
///
/// Serialized as `[titles, row, row, ..]`, or `[]` when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTable {
    kind: TableKind,
    titles: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Why a table came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDefect {
    /// No header row or no usable titles.
    NoTitles,
    /// No body rows.
    NoRows,
    /// A row's width differs from the title count.
    WidthMismatch {
        /// Zero-based row position.
        row: usize,
        /// Cells found.
        width: usize,
        /// Titles found.
        expected: usize,
    },
}

impl std::fmt::Display for TableDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTitles => f.write_str("no column titles"),
            Self::NoRows => f.write_str("no data rows"),
            Self::WidthMismatch {
                row,
                width,
                expected,
            } => write!(f, "row {row} has {width} cells, expected {expected}"),
        }
    }
}

impl StatsTable {
    /// An empty table of `kind`.
    #[must_use]
    pub fn empty(kind: TableKind) -> Self {
        Self {
            kind,
            titles: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Builds a table, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns the [`TableDefect`] that prevents a rectangular table.
    pub fn try_new(
        kind: TableKind,
        titles: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TableDefect> {
        if titles.is_empty() {
            return Err(TableDefect::NoTitles);
        }
        if rows.is_empty() {
            return Err(TableDefect::NoRows);
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != titles.len())
        {
            return Err(TableDefect::WidthMismatch {
                row,
                width: cells.len(),
                expected: titles.len(),
            });
        }
        Ok(Self { kind, titles, rows })
    }

    /// Which of the page's tables this is.
    #[must_use]
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Column titles, synthetic `Team`/`Outcome` column included.
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Data rows; each is exactly as wide as [`titles`](Self::titles).
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns whether extraction failed and the table carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl Serialize for StatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_empty() {
            return serializer.serialize_seq(Some(0))?.end();
        }
        let mut seq = serializer.serialize_seq(Some(self.rows.len() + 1))?;
        seq.serialize_element(&self.titles)?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
