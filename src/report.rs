use std::fmt::Write;

use crate::models::{Direction, LeaderboardEntry, LeaderboardView, Visibility};
use crate::rank::ordinal;

fn entry_line(entry: &LeaderboardEntry) -> String {
    let you = if entry.visibility == Visibility::Own {
        " (you)"
    } else {
        ""
    };
    let activity = if entry.ranked.user.baseline_applied {
        "no logs in window".to_string()
    } else {
        match entry.ranked.user.entries_in_window {
            1 => "1 log".to_string(),
            count => format!("{count} logs"),
        }
    };
    format!(
        "- {} {}{}: {:.2} kgCO2 ({})",
        ordinal(entry.rank()),
        entry.display_name(),
        you,
        entry.ranked.user.display_score,
        activity
    )
}

/// Renders a view as Markdown, listing at most `remainder_limit` rows below the podium.
pub fn build_report(view: &LeaderboardView, remainder_limit: usize) -> String {
    let mut output = String::new();
    let goal = match view.direction {
        Direction::Ascending => "lowest footprint wins",
        Direction::Descending => "highest score wins",
    };

    let _ = writeln!(output, "# Karbon Leaderboard");
    let _ = writeln!(output, "Window {} ({goal})", view.window);
    let _ = writeln!(output);

    if view.is_empty() {
        let _ = writeln!(output, "No participants yet.");
        return output;
    }

    let _ = writeln!(output, "## Podium");
    for entry in view.podium.iter() {
        let _ = writeln!(output, "{}", entry_line(entry));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rankings");
    if view.remainder.is_empty() {
        let _ = writeln!(output, "Everyone made the podium.");
    } else {
        for entry in view.remainder.iter().take(remainder_limit) {
            let _ = writeln!(output, "{}", entry_line(entry));
        }
        let hidden = view.remainder.len().saturating_sub(remainder_limit);
        if hidden > 0 {
            let _ = writeln!(output, "- ... and {hidden} more");
        }
    }

    if let Some(own) = view.viewer_entry() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "You are {} of {} this window.",
            ordinal(own.rank()),
            view.len()
        );
    }

    output
}
