//! Player scoreboard models.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One scoreboard row as read from the page, before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    /// Player name, taken verbatim from the first column
    pub player_id: String,

    /// Kill count (second column)
    pub kills: i64,

    /// Average combat score (fifth column)
    pub acs: i64,
}

impl PlayerLine {
    pub(crate) fn new(player_id: impl Into<String>, kills: i64, acs: i64) -> Self {
        Self {
            player_id: player_id.into(),
            kills,
            acs,
        }
    }

    /// Ranking order: more kills first, ties broken by higher ACS.
    ///
    /// Lines equal on both keys compare `Equal`, so a stable sort keeps
    /// them in page order.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .kills
            .cmp(&self.kills)
            .then_with(|| other.acs.cmp(&self.acs))
    }

    /// Attach a 1-based position.
    pub(crate) fn into_result(self, position: u32) -> PlayerResult {
        PlayerResult {
            player_id: self.player_id,
            kills: self.kills,
            acs: self.acs,
            position,
        }
    }
}

/// A ranked player, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Player name (not guaranteed unique)
    pub player_id: String,

    pub kills: i64,

    pub acs: i64,

    /// Rank after sorting (1 = top)
    pub position: u32,
}
