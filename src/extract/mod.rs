//! Scoreboard extraction and ranking.
//!
//! Reads every `table tbody tr` row of a match page, keeps rows with at
//! least five cells, and ranks players by kills then ACS.
//!
//! Column layout of a qualifying row:
//!
//! | index | field   |
//! |-------|---------|
//! | 0     | name    |
//! | 1     | kills   |
//! | 2, 3  | ignored |
//! | 4     | ACS     |

use std::num::ParseIntError;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::fetch::{parse_page_url, DocumentSource, FetchError};
use crate::models::{PlayerLine, PlayerResult};

/// Rows with fewer cells than this are skipped.
pub const MIN_CELLS: usize = 5;

const NAME_COL: usize = 0;
const KILLS_COL: usize = 1;
const ACS_COL: usize = 4;

/// Errors that abort an extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Row {row}: {column} value '{value}' is not an integer")]
    FieldParse {
        row: usize,
        column: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Text of a cell with every text node trimmed and the non-empty pieces
/// joined without a separator.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_int(row: usize, column: &'static str, cell: &ElementRef) -> Result<i64, ExtractError> {
    let value = cell_text(cell);
    value
        .parse::<i64>()
        .map_err(|source| ExtractError::FieldParse {
            row,
            column,
            value,
            source,
        })
}

/// Pull player lines out of a match page, in document order.
///
/// A row whose kills or ACS cell is not an integer fails the whole parse.
pub fn parse_player_lines(html: &str) -> Result<Vec<PlayerLine>, ExtractError> {
    let document = Html::parse_document(html);

    let row_sel = Selector::parse("table tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut lines = Vec::new();

    for (row_idx, row) in document.select(&row_sel).enumerate() {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < MIN_CELLS {
            trace!("Skipping row {} with {} cells", row_idx, cells.len());
            continue;
        }

        let player_id = cell_text(&cells[NAME_COL]);
        let kills = parse_int(row_idx, "kills", &cells[KILLS_COL])?;
        let acs = parse_int(row_idx, "acs", &cells[ACS_COL])?;

        lines.push(PlayerLine::new(player_id, kills, acs));
    }

    Ok(lines)
}

/// Sort lines by kills then ACS (both descending) and number them from 1.
///
/// The sort is stable: fully tied lines keep their input order.
pub fn rank_players(mut lines: Vec<PlayerLine>) -> Vec<PlayerResult> {
    lines.sort_by(PlayerLine::ranking_cmp);

    lines
        .into_iter()
        .zip(1u32..)
        .map(|(line, position)| line.into_result(position))
        .collect()
}

/// Parse and rank a match page already in memory.
pub fn extract_from_html(html: &str) -> Result<Vec<PlayerResult>, ExtractError> {
    let lines = parse_player_lines(html)?;
    debug!("Parsed {} player rows", lines.len());
    Ok(rank_players(lines))
}

/// Fetches match pages and turns them into ranked player results.
#[derive(Clone)]
pub struct MatchStatsExtractor {
    source: Arc<dyn DocumentSource>,
}

impl MatchStatsExtractor {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Fetch `url` and extract its ranked scoreboard.
    pub async fn extract(&self, url: &str) -> Result<Vec<PlayerResult>, ExtractError> {
        let url = parse_page_url(url)?;
        info!("Extracting match stats from {} via {}", url, self.source.name());

        let html = self.source.fetch_text(&url).await?;
        extract_from_html(&html)
    }
}
