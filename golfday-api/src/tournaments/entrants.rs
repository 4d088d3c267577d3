use serde::{Deserialize, Serialize};

use crate::id::{EntrantId, UserId};

/// A user entered into the bracket of a tournament.
///
/// The list of entrants of a tournament is ordered by `seed`; the bracket
/// engine refers to entrants by their position in that list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    #[serde(default)]
    pub id: EntrantId,
    pub user_id: UserId,
    /// 1-based seed rank, unique within the tournament.
    pub seed: u32,
}
