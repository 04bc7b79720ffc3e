use crate::config::LeaderboardConfig;
use crate::models::{IdentityId, LeaderboardEntry, RankedUser, Visibility};

pub fn visibility(user: &RankedUser, viewer: Option<&IdentityId>) -> Visibility {
    match viewer {
        Some(viewer) if *viewer == user.user.identity_id => Visibility::Own,
        _ => Visibility::Masked,
    }
}

/// Returns the entry as `viewer` may see it. Total: every input yields an entry.
pub fn mask(
    mut user: RankedUser,
    viewer: Option<&IdentityId>,
    config: &LeaderboardConfig,
) -> LeaderboardEntry {
    let visibility = visibility(&user, viewer);
    if visibility == Visibility::Masked {
        user.user.display_name = mask_name(&user.user.display_name, config.mask_char);
        user.user.avatar = Some(config.default_avatar.clone());
    }
    LeaderboardEntry {
        visibility,
        ranked: user,
    }
}

/// Keeps the first and last character and replaces the rest with `mask_char`.
/// Names of two characters or fewer are returned as is.
pub fn mask_name(name: &str, mask_char: char) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 2 {
        return name.to_string();
    }
    let last = chars.len() - 1;
    chars
        .iter()
        .enumerate()
        .map(|(index, c)| if index == 0 || index == last { *c } else { mask_char })
        .collect()
}
