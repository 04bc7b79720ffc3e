use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// Score given to a participant with no valid entries in the window.
pub const DEFAULT_BASELINE_SCORE: f64 = 100.0;
pub const DEFAULT_MASK_CHAR: char = '*';
pub const DEFAULT_AVATAR: &str = "icon:user";
/// Rows listed below the podium in rendered reports.
pub const DEFAULT_REMAINDER_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub baseline_score: f64,
    pub mask_char: char,
    pub default_avatar: String,
}

impl LeaderboardConfig {
    pub fn new(
        baseline_score: f64,
        mask_char: char,
        default_avatar: impl Into<String>,
    ) -> Result<Self, LeaderboardError> {
        if !baseline_score.is_finite() || baseline_score < 0.0 {
            return Err(LeaderboardError::InvalidBaseline(baseline_score));
        }
        Ok(Self {
            baseline_score,
            mask_char,
            default_avatar: default_avatar.into(),
        })
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            baseline_score: DEFAULT_BASELINE_SCORE,
            mask_char: DEFAULT_MASK_CHAR,
            default_avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}
