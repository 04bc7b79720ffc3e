use tracing::{debug, info};

use crate::aggregate::{round_display, window_total};
use crate::config::LeaderboardConfig;
use crate::mask::mask;
use crate::models::{
    Direction, IdentityId, LeaderboardView, ScoredUser, UserRecord, WindowSpec,
};
use crate::normalize::normalize;
use crate::rank::{partition, rank};

/// What the presentation layer asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRequest {
    /// `None` when nobody is signed in.
    pub viewer: Option<IdentityId>,
    pub window: WindowSpec,
    pub direction: Direction,
}

pub fn score_user(user: &UserRecord, window: &WindowSpec, config: &LeaderboardConfig) -> ScoredUser {
    let logs = normalize(&user.logs);
    let total = window_total(&logs, window);
    let baseline_applied = total.count == 0;
    if baseline_applied {
        debug!(identity = %user.identity_id, "no activity in window, using baseline");
    }
    let score = total.score_or(config.baseline_score);

    ScoredUser {
        identity_id: user.identity_id.clone(),
        display_name: user.display_name.clone(),
        avatar: user.avatar.clone(),
        score,
        display_score: round_display(score),
        entries_in_window: total.count,
        baseline_applied,
        logs,
    }
}

/// Builds the viewer-specific leaderboard. Every user in `users` appears exactly once.
pub fn build_leaderboard(
    users: &[UserRecord],
    request: &LeaderboardRequest,
    config: &LeaderboardConfig,
) -> LeaderboardView {
    let scored: Vec<ScoredUser> = users
        .iter()
        .map(|user| score_user(user, &request.window, config))
        .collect();

    let (podium, remainder) = partition(rank(scored, request.direction));
    let viewer = request.viewer.as_ref();

    let view = LeaderboardView {
        podium: podium.into_iter().map(|user| mask(user, viewer, config)).collect(),
        remainder: remainder
            .into_iter()
            .map(|user| mask(user, viewer, config))
            .collect(),
        viewer_id: request.viewer.clone(),
        window: request.window,
        direction: request.direction,
    };

    info!(
        users = view.len(),
        window = %request.window,
        direction = %request.direction,
        viewer_ranked = view.viewer_entry().is_some(),
        "built leaderboard"
    );
    view
}
