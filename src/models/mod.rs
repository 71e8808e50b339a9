pub mod fixture;
pub mod league;
pub mod odds;
pub mod stats;

pub use fixture::{Fixture, MatchStatus, TeamRef};
pub use league::League;
pub use odds::{Bookmaker, FixtureOdds, OddsLine};
pub use stats::StatBlock;
