use serde::{Deserialize, Serialize};

use crate::id::{EntrantId, MatchId, TournamentId};

/// A single bracket match as stored and served.
///
/// `player1`/`player2` are `None` when the spot is unoccupied: in round 1
/// that means a bye hole, in later rounds it means the feeding match has
/// not been decided yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Round the match is played in, 1 to 4.
    pub round: u32,
    /// 1-based match number within the round.
    pub number: u32,
    pub player1: Option<EntrantId>,
    pub player2: Option<EntrantId>,
    /// Strokes taken by `player1`; lower wins.
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner: Option<EntrantId>,
    pub status: MatchStatus,
}

/// The lifecycle state of a match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Bye,
}

impl MatchStatus {
    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Scheduled => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Bye => 3,
        }
    }

    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Scheduled),
            1 => Some(Self::InProgress),
            2 => Some(Self::Completed),
            3 => Some(Self::Bye),
            _ => None,
        }
    }
}

impl From<golfday_core::MatchStatus> for MatchStatus {
    fn from(status: golfday_core::MatchStatus) -> Self {
        match status {
            golfday_core::MatchStatus::Scheduled => Self::Scheduled,
            golfday_core::MatchStatus::InProgress => Self::InProgress,
            golfday_core::MatchStatus::Completed => Self::Completed,
            golfday_core::MatchStatus::Bye => Self::Bye,
        }
    }
}

impl From<MatchStatus> for golfday_core::MatchStatus {
    fn from(status: MatchStatus) -> Self {
        match status {
            MatchStatus::Scheduled => Self::Scheduled,
            MatchStatus::InProgress => Self::InProgress,
            MatchStatus::Completed => Self::Completed,
            MatchStatus::Bye => Self::Bye,
        }
    }
}

/// The request body for recording a match result.
///
/// Both scores are required for a regular match; a bye is recorded with
/// both scores absent.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultInput {
    pub score1: Option<u32>,
    pub score2: Option<u32>,
}

/// The request body for assigning the spots of a match in a manually
/// drawn bracket.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub player1: Option<EntrantId>,
    pub player2: Option<EntrantId>,
}

#[cfg(test)]
mod tests {
    use super::MatchStatus;

    #[test]
    fn test_match_status_u8() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::InProgress,
            MatchStatus::Completed,
            MatchStatus::Bye,
        ] {
            assert_eq!(MatchStatus::from_u8(status.to_u8()), Some(status));
        }

        assert_eq!(MatchStatus::from_u8(4), None);
    }
}
