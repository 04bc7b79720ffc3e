use std::cmp::Ordering;

use crate::models::{Direction, RankedUser, ScoredUser};

/// Orders users by score in `direction`, breaking ties by identity ascending,
/// and numbers them 1..=N.
pub fn rank(mut users: Vec<ScoredUser>, direction: Direction) -> Vec<RankedUser> {
    users.sort_by(|a, b| compare(a, b, direction));

    let ranked: Vec<RankedUser> = users
        .into_iter()
        .enumerate()
        .map(|(index, user)| RankedUser {
            rank: index + 1,
            user,
        })
        .collect();

    debug_assert!(is_contiguous(&ranked));
    ranked
}

/// Descending mode sorts users without activity after every active user.
fn compare(a: &ScoredUser, b: &ScoredUser, direction: Direction) -> Ordering {
    let by_score = match direction {
        Direction::Ascending => a.score.total_cmp(&b.score),
        Direction::Descending => a
            .baseline_applied
            .cmp(&b.baseline_applied)
            .then_with(|| b.score.total_cmp(&a.score)),
    };
    by_score.then_with(|| a.identity_id.cmp(&b.identity_id))
}

/// Splits ranked users into the podium (display order 2nd, 1st, 3rd) and the rest.
pub fn partition(mut ranked: Vec<RankedUser>) -> (Vec<RankedUser>, Vec<RankedUser>) {
    let remainder = ranked.split_off(ranked.len().min(3));
    let mut podium = ranked;
    if podium.len() == 3 {
        podium.swap(0, 1);
    }
    (podium, remainder)
}

/// True when the ranks are exactly {1, ..., N}.
pub fn is_contiguous(ranked: &[RankedUser]) -> bool {
    let mut ranks: Vec<usize> = ranked.iter().map(|entry| entry.rank).collect();
    ranks.sort_unstable();
    ranks.iter().enumerate().all(|(index, rank)| *rank == index + 1)
}

pub fn ordinal(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (1, hundreds) if hundreds != 11 => "st",
        (2, hundreds) if hundreds != 12 => "nd",
        (3, hundreds) if hundreds != 13 => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentityId;

    fn scored(id: &str, score: f64) -> ScoredUser {
        ScoredUser {
            identity_id: IdentityId::new(id),
            display_name: id.to_string(),
            avatar: None,
            score,
            display_score: score,
            entries_in_window: 1,
            baseline_applied: false,
            logs: Vec::new(),
        }
    }

    fn ids(ranked: &[RankedUser]) -> Vec<&str> {
        ranked.iter().map(|entry| entry.user.identity_id.as_str()).collect()
    }

    #[test]
    fn ascending_breaks_ties_by_identity() {
        let users = vec![scored("a", 10.0), scored("c", 5.0), scored("b", 5.0), scored("d", 20.0)];
        let ranked = rank(users, Direction::Ascending);
        assert_eq!(ids(&ranked), vec!["b", "c", "a", "d"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn descending_keeps_identity_tie_break_ascending() {
        let users = vec![scored("a", 10.0), scored("c", 5.0), scored("b", 5.0), scored("d", 20.0)];
        let ranked = rank(users, Direction::Descending);
        assert_eq!(ids(&ranked), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn descending_puts_inactive_users_last() {
        let mut idle = scored("idle", 100.0);
        idle.baseline_applied = true;
        let users = vec![idle, scored("active", 50.0), scored("busy", 120.0)];

        let ranked = rank(users.clone(), Direction::Descending);
        assert_eq!(ids(&ranked), vec!["busy", "active", "idle"]);

        let ranked = rank(users, Direction::Ascending);
        assert_eq!(ids(&ranked), vec!["active", "idle", "busy"]);
    }

    #[test]
    fn unrounded_scores_decide_order() {
        let users = vec![scored("a", 5.004), scored("b", 5.001)];
        let ranked = rank(users, Direction::Ascending);
        assert_eq!(ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn podium_centres_the_winner() {
        let ranked = rank(
            vec![scored("a", 1.0), scored("b", 2.0), scored("c", 3.0), scored("d", 4.0)],
            Direction::Ascending,
        );
        let (podium, remainder) = partition(ranked);
        assert_eq!(ids(&podium), vec!["b", "a", "c"]);
        assert_eq!(ids(&remainder), vec!["d"]);
    }

    #[test]
    fn short_podium_stays_in_rank_order() {
        let ranked = rank(vec![scored("b", 2.0), scored("a", 1.0)], Direction::Ascending);
        let (podium, remainder) = partition(ranked);
        assert_eq!(ids(&podium), vec!["a", "b"]);
        assert!(remainder.is_empty());

        let (podium, remainder) = partition(Vec::new());
        assert!(podium.is_empty() && remainder.is_empty());
    }

    #[test]
    fn contiguity_check_catches_gaps_and_duplicates() {
        let mut ranked = rank(vec![scored("a", 1.0), scored("b", 2.0)], Direction::Ascending);
        assert!(is_contiguous(&ranked));
        ranked[1].rank = 1;
        assert!(!is_contiguous(&ranked));
        ranked[1].rank = 3;
        assert!(!is_contiguous(&ranked));
    }

    #[test]
    fn ordinals_follow_english_suffixes() {
        let labels: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 101, 111, 112]
            .into_iter()
            .map(ordinal)
            .collect();
        assert_eq!(
            labels,
            vec![
                "1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd",
                "101st", "111th", "112th"
            ]
        );
    }
}
