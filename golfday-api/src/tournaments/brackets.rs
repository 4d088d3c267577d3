use serde::{Deserialize, Serialize};

pub use golfday_core::{BracketOptions, SeedingMode, TieBreak};

use super::entrants::Entrant;
use super::matches::Match;

/// The full bracket of a tournament: the seed-ordered entrants and all 15
/// matches ordered by round, then by match number.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub entrants: Vec<Entrant>,
    pub matches: Vec<Match>,
}

/// The request body for (re)generating a bracket.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerateBracket {
    #[serde(default)]
    pub options: BracketOptions,
}
