pub mod match_result;
pub mod rules;
pub mod standings;
pub mod team;

pub use match_result::{MatchPhase, MatchResult};
pub use rules::{
    RankingConvention, TournamentRules, DRAW_POINTS, INNINGS_OUTS_PER_GAME, WIN_PCT_EPSILON,
    WIN_POINTS,
};
pub use standings::{GroupStandings, TeamStandingRow, ThirdPlaceEntry, ThirdPlaceRanking};
pub use team::{GroupCode, TeamEntry};
