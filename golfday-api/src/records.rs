use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{RecordId, UserId};

/// A skills contest entry outside the bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GolfRecord {
    #[serde(default)]
    pub id: RecordId,
    pub user_id: UserId,
    pub kind: RecordKind,
    /// Distance in meters for `Longest` and `Nearest`, number of putts
    /// for `Putting`.
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// The skills contest a record belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Longest drive; the highest value wins.
    Longest,
    /// Putting contest; the lowest value wins.
    Putting,
    /// Nearest to the pin; the lowest value wins.
    Nearest,
}

impl RecordKind {
    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Longest => 0,
            Self::Putting => 1,
            Self::Nearest => 2,
        }
    }

    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Longest),
            1 => Some(Self::Putting),
            2 => Some(Self::Nearest),
            _ => None,
        }
    }

    /// Returns `true` if a higher value beats a lower one.
    #[inline]
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Self::Longest)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Longest => "Longest",
                Self::Putting => "Putting",
                Self::Nearest => "Nearest",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::RecordKind;

    #[test]
    fn test_record_kind_u8() {
        for kind in [RecordKind::Longest, RecordKind::Putting, RecordKind::Nearest] {
            assert_eq!(RecordKind::from_u8(kind.to_u8()), Some(kind));
        }

        assert_eq!(RecordKind::from_u8(3), None);
    }
}
