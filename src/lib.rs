//! Carbon footprint leaderboard engine.
//!
//! Raw emission logs go through the normalizer, get summed over a caller
//! supplied window, ranked with a deterministic tie-break and finally masked
//! so a viewer only ever sees their own name and avatar in full.
//!
//! ```text
//! UserRecord[] -> normalize -> aggregate -> rank -> mask -> LeaderboardView
//! ```
//!
//! The engine is pure. Fetching participants (`db`, `source`) and picking the
//! window happen before [`leaderboard::build_leaderboard`] is called.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod leaderboard;
pub mod mask;
pub mod models;
pub mod normalize;
pub mod rank;
pub mod report;
pub mod source;

pub use config::LeaderboardConfig;
pub use error::LeaderboardError;
pub use leaderboard::{build_leaderboard, LeaderboardRequest};
pub use models::{
    Direction, IdentityId, LeaderboardEntry, LeaderboardView, RankedUser, RawLogEntry,
    ScoredUser, UserRecord, Visibility, WindowSpec,
};
