use std::sync::Arc;

use crate::extract::MatchStatsExtractor;

#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<MatchStatsExtractor>,
}
