//! # golfday-core
//!
//! This crate contains the bracket engine for the golf day tournament: a
//! fixed-size single elimination tree for up to 16 entrants, played over
//! 4 rounds (8, 4, 2 and 1 matches).
//!
//! Important types:
//! - [`SingleElimination16`]: the bracket itself, including generation,
//! result recording and winner advancement.
//! - [`Entrants`]: A wrapper around `Vec<T>` where `T` is an entrant in the
//! tournament roster, ordered by seed.
//! - [`BracketMatch`]: A single match between two [`Spot`]s.
//! - [`Spot`]: A slot within a match, which can contain an entrant, be
//! permanently empty (a bye hole) or await an upstream winner.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all bracket types.

mod single_elimination;

pub use single_elimination::{
    BracketOptions, RecordOutcome, SeedingMode, SingleElimination16, TieBreak,
};

use thiserror::Error;

use std::ops::{Deref, DerefMut};
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of rounds in the bracket.
pub const ROUNDS: u32 = 4;

/// Maximum number of entrants taking part in round 1.
pub const MAX_ENTRANTS: usize = 16;

/// Total number of matches in a complete bracket.
pub const TOTAL_MATCHES: usize = 15;

/// Number of matches played in every round.
pub const ROUND_SIZES: [u32; ROUNDS as usize] = [8, 4, 2, 1];

/// Returns the position of the first match of `round` within the linear
/// match list, or `None` if `round` is out of range.
pub fn round_offset(round: u32) -> Option<usize> {
    match round {
        1 => Some(0),
        2 => Some(8),
        3 => Some(12),
        4 => Some(14),
        _ => None,
    }
}

/// Returns the position of the match `(round, number)` within the linear
/// match list. `number` is 1-based and dense within its round.
pub fn linear_index(round: u32, number: u32) -> Option<usize> {
    let offset = round_offset(round)?;

    if number == 0 || number > ROUND_SIZES[(round - 1) as usize] {
        return None;
    }

    Some(offset + (number - 1) as usize)
}

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant of
/// the tournament. The order of the entrants is the seed order: index 0 is
/// the strongest seed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T> DerefMut for Entrants<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entrants
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// A spot for an entrant within a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Spot {
    /// Occupied by the entrant at the given roster index.
    Entrant(usize),
    /// Permanently empty. The opposing spot wins by bye.
    Empty,
    /// Awaiting the winner of an earlier match.
    Tbd,
}

impl Spot {
    /// Creates a new `Spot` from an [`Option`]. A `Some(index)` value
    /// translates into `Entrant(index)`, a `None` value into `Empty`.
    pub fn new(entrant: Option<usize>) -> Self {
        match entrant {
            Some(index) => Self::Entrant(index),
            None => Self::Empty,
        }
    }

    /// Returns `true` if the `Spot` is [`Entrant`].
    ///
    /// [`Entrant`]: Self::Entrant
    #[inline]
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns the roster index of the occupant, if any.
    #[inline]
    pub fn entrant(&self) -> Option<usize> {
        match self {
            Self::Entrant(index) => Some(*index),
            _ => None,
        }
    }
}

/// One of the two sides of a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the position of the side within a match.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// The lifecycle state of a match.
///
/// `InProgress` exists for compatibility with callers that track live
/// matches; no engine operation transitions into it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Bye,
}

/// A single match within the bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketMatch {
    /// Round the match is played in, 1 (round of 16) to 4 (final).
    pub round: u32,
    /// 1-based match number, dense within the round.
    pub number: u32,
    pub spots: [Spot; 2],
    pub scores: [Option<u32>; 2],
    /// Winning side, set once the match is completed or a bye.
    pub winner: Option<Side>,
    pub status: MatchStatus,
}

impl BracketMatch {
    /// Creates a new untouched match with the given spots.
    pub fn new(round: u32, number: u32, spots: [Spot; 2]) -> Self {
        Self {
            round,
            number,
            spots,
            scores: [None, None],
            winner: None,
            status: MatchStatus::Scheduled,
        }
    }

    /// Returns the roster index of the winning entrant, if a winner has
    /// been decided.
    pub fn winner_entrant(&self) -> Option<usize> {
        let side = self.winner?;
        self.spots[side.index()].entrant()
    }

    /// Returns the side holding the only occupant if exactly one spot is
    /// occupied, i.e. the match is a bye.
    pub fn sole_occupant(&self) -> Option<Side> {
        match (self.spots[0].is_entrant(), self.spots[1].is_entrant()) {
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            _ => None,
        }
    }

    /// Returns the match fed by this one: `(round, number, side)` of the
    /// spot the winner advances into. Returns `None` for the final.
    pub fn next_match(&self) -> Option<(u32, u32, Side)> {
        if self.round >= ROUNDS {
            return None;
        }

        // ceil(number / 2); odd numbers feed spot A, even numbers spot B.
        let number = (self.number + 1) / 2;
        let side = if self.number % 2 == 1 {
            Side::A
        } else {
            Side::B
        };

        Some((self.round + 1, number, side))
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient entrants: a bracket requires at least 2, found {found}")]
    InsufficientEntrants { found: usize },
    #[error("no match at round {round}, number {number}")]
    MatchNotFound { round: u32, number: u32 },
    #[error("invalid score: {0}")]
    InvalidScore(&'static str),
    #[error("bracket is corrupted: missing downstream match at round {round}, number {number}")]
    DownstreamMatchMissing { round: u32, number: u32 },
    #[error("invalid number of matches: expected {expected}, found {found}")]
    InvalidNumberOfMatches { expected: usize, found: usize },
    #[error(
        "invalid entrant: match refers to entrant at {index} but only {length} entrants are given"
    )]
    InvalidEntrant { index: usize, length: usize },
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::Entrants;

    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_entrants_serde() {
        let entrants: Entrants<u32> = vec![1, 2, 3].into();

        assert_tokens(
            &entrants,
            &[
                Token::Seq { len: Some(3) },
                Token::U32(1),
                Token::U32(2),
                Token::U32(3),
                Token::SeqEnd,
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{linear_index, round_offset, BracketMatch, Side, Spot};

    #[test]
    fn test_linear_index() {
        assert_eq!(round_offset(1), Some(0));
        assert_eq!(round_offset(4), Some(14));
        assert_eq!(round_offset(5), None);

        assert_eq!(linear_index(1, 1), Some(0));
        assert_eq!(linear_index(1, 8), Some(7));
        assert_eq!(linear_index(2, 1), Some(8));
        assert_eq!(linear_index(3, 2), Some(13));
        assert_eq!(linear_index(4, 1), Some(14));

        assert_eq!(linear_index(1, 0), None);
        assert_eq!(linear_index(2, 5), None);
        assert_eq!(linear_index(4, 2), None);
        assert_eq!(linear_index(0, 1), None);
    }

    #[test]
    fn test_next_match() {
        let m = BracketMatch::new(1, 1, [Spot::Entrant(0), Spot::Entrant(1)]);
        assert_eq!(m.next_match(), Some((2, 1, Side::A)));

        let m = BracketMatch::new(1, 8, [Spot::Entrant(0), Spot::Entrant(1)]);
        assert_eq!(m.next_match(), Some((2, 4, Side::B)));

        let m = BracketMatch::new(3, 2, [Spot::Tbd, Spot::Tbd]);
        assert_eq!(m.next_match(), Some((4, 1, Side::B)));

        let m = BracketMatch::new(4, 1, [Spot::Tbd, Spot::Tbd]);
        assert_eq!(m.next_match(), None);
    }

    #[test]
    fn test_sole_occupant() {
        let m = BracketMatch::new(1, 1, [Spot::Entrant(0), Spot::Empty]);
        assert_eq!(m.sole_occupant(), Some(Side::A));

        let m = BracketMatch::new(1, 1, [Spot::Empty, Spot::Entrant(3)]);
        assert_eq!(m.sole_occupant(), Some(Side::B));

        let m = BracketMatch::new(1, 1, [Spot::Entrant(0), Spot::Entrant(1)]);
        assert_eq!(m.sole_occupant(), None);

        let m = BracketMatch::new(1, 1, [Spot::Empty, Spot::Empty]);
        assert_eq!(m.sole_occupant(), None);
    }
}
