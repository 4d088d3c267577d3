use serde::{Deserialize, Serialize};

use crate::id::{TeamId, UserId};

/// Maximum number of members of an executive team.
pub const MAX_TEAM_MEMBERS: usize = 3;

/// A team in the executive stroke play event.
///
/// `members` holds between 1 and [`MAX_TEAM_MEMBERS`] users; `score` is the
/// team's stroke total once posted. Lower totals rank higher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveTeam {
    #[serde(default)]
    pub id: TeamId,
    pub name: String,
    pub members: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl ExecutiveTeam {
    /// Returns `true` if the member list is within bounds.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.members.is_empty() && self.members.len() <= MAX_TEAM_MEMBERS
    }
}

/// The request body for posting the stroke play total of a team.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TeamScore {
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::{ExecutiveTeam, MAX_TEAM_MEMBERS};
    use crate::id::UserId;

    #[test]
    fn test_team_is_valid() {
        let mut team = ExecutiveTeam {
            id: 1.into(),
            name: String::from("Team A"),
            members: vec![UserId(1), UserId(2)],
            score: None,
        };
        assert!(team.is_valid());

        team.members.clear();
        assert!(!team.is_valid());

        team.members = (0..MAX_TEAM_MEMBERS as u64 + 1).map(UserId).collect();
        assert!(!team.is_valid());
    }
}
