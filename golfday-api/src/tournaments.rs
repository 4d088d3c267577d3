pub mod brackets;
pub mod entrants;
pub mod matches;

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{TournamentId, UserId};

/// A reduced tournament as returned by the list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentOverview {
    pub id: TournamentId,
    pub name: String,
    pub kind: TournamentKind,
    pub status: TournamentStatus,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(default)]
    pub id: TournamentId,
    pub name: String,
    pub kind: TournamentKind,
    #[serde(default)]
    pub status: TournamentStatus,
    /// RFC3339
    pub date: DateTime<Utc>,
    /// Users taking part, in seed order.
    #[serde(default)]
    pub participants: Vec<UserId>,
}

/// The competition format of a tournament.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentKind {
    /// Per-department single elimination bracket.
    Department,
    /// Executive team stroke play, no bracket.
    Executive,
}

impl TournamentKind {
    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Department => 0,
            Self::Executive => 1,
        }
    }

    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Department),
            1 => Some(Self::Executive),
            _ => None,
        }
    }
}

impl Display for TournamentKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Department => "Department",
                Self::Executive => "Executive",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

impl TournamentStatus {
    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Upcoming => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Upcoming),
            1 => Some(Self::InProgress),
            2 => Some(Self::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TournamentKind, TournamentStatus};

    #[test]
    fn test_tournament_kind_u8() {
        for kind in [TournamentKind::Department, TournamentKind::Executive] {
            assert_eq!(TournamentKind::from_u8(kind.to_u8()), Some(kind));
        }

        assert_eq!(TournamentKind::from_u8(2), None);
    }

    #[test]
    fn test_tournament_status_u8() {
        for status in [
            TournamentStatus::Upcoming,
            TournamentStatus::InProgress,
            TournamentStatus::Completed,
        ] {
            assert_eq!(TournamentStatus::from_u8(status.to_u8()), Some(status));
        }

        assert_eq!(TournamentStatus::from_u8(3), None);
    }
}
