use crate::{
    linear_index, round_offset, BracketMatch, Entrants, Error, MatchStatus, Result, Side, Spot,
    MAX_ENTRANTS, ROUNDS, ROUND_SIZES, TOTAL_MATCHES,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How round 1 is populated when the bracket is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedingMode {
    /// Pair by seed rank: 1 vs 16, 2 vs 15, and so on. Entrants without an
    /// opponent receive a bye.
    #[default]
    Seeded,
    /// Create all round 1 matches empty; spots are filled later via
    /// [`SingleElimination16::assign_slots`].
    Manual,
}

/// How a tied score is resolved in [`SingleElimination16::record_result`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreak {
    /// Reject the result; a decisive score is required.
    #[default]
    Reject,
    /// Award the match to spot A.
    SlotA,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketOptions {
    pub seeding: SeedingMode,
    pub tie_break: TieBreak,
}

/// The result of recording a match outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The side that won the match.
    pub winner: Side,
    /// Roster index of the winning entrant.
    pub winner_entrant: usize,
    /// The `(round, number, side)` spot the winner was advanced into, or
    /// `None` if the match was the final.
    pub advanced: Option<(u32, u32, Side)>,
}

/// A 16-slot single elimination bracket played over 4 rounds.
///
/// The bracket always contains exactly 15 matches (8 + 4 + 2 + 1). Rosters
/// smaller than 16 leave the trailing round 1 matches empty; a match with a
/// single occupant is a bye whose occupant advances without a score.
#[derive(Clone, Debug)]
pub struct SingleElimination16<T> {
    entrants: Entrants<T>,
    matches: Vec<BracketMatch>,
    options: BracketOptions,
}

impl<T> SingleElimination16<T> {
    /// Creates a new bracket from the given `entrants`, which must be in
    /// seed order (strongest seed first). At most [`MAX_ENTRANTS`] entrants
    /// are used; the rest are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientEntrants`] when fewer than 2 entrants
    /// are given. No matches are created in that case.
    pub fn generate<I>(entrants: I, options: BracketOptions) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut entrants: Entrants<T> = entrants.into_iter().collect();
        entrants.truncate(MAX_ENTRANTS);

        let len = entrants.len();
        if len < 2 {
            return Err(Error::InsufficientEntrants { found: len });
        }

        log::debug!(
            "Creating new bracket with {} entrants (mode: {:?})",
            len,
            options.seeding
        );

        let mut matches = Vec::with_capacity(TOTAL_MATCHES);

        for number in 1..=ROUND_SIZES[0] {
            let spots = match options.seeding {
                SeedingMode::Manual => [Spot::Empty, Spot::Empty],
                SeedingMode::Seeded => {
                    let k = number as usize;

                    // Match k pairs rank k against rank len+1-k. Matches
                    // beyond the occupied half of the draw stay empty.
                    if k <= (len + 1) / 2 {
                        let second = if len - k > k - 1 {
                            Spot::Entrant(len - k)
                        } else {
                            Spot::Empty
                        };

                        [Spot::Entrant(k - 1), second]
                    } else {
                        [Spot::Empty, Spot::Empty]
                    }
                }
            };

            matches.push(BracketMatch::new(1, number, spots));
        }

        for round in 2..=ROUNDS {
            for number in 1..=ROUND_SIZES[(round - 1) as usize] {
                matches.push(BracketMatch::new(round, number, [Spot::Tbd, Spot::Tbd]));
            }
        }

        let mut this = Self {
            entrants,
            matches,
            options,
        };

        // Byes created by seeding are decided immediately; their occupant
        // advances into round 2 without a score.
        for index in 0..ROUND_SIZES[0] as usize {
            if let Some(side) = this.matches[index].sole_occupant() {
                this.matches[index].winner = Some(side);
                this.matches[index].status = MatchStatus::Bye;
                this.advance(index)?;
            }
        }

        log::debug!("Created new bracket with {} matches", this.matches.len());

        Ok(this)
    }

    /// Resumes a bracket from existing matches.
    ///
    /// `matches` must hold the full 15-match bracket ordered by round, then
    /// by match number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumberOfMatches`] if `matches` does not have
    /// the 8/4/2/1 shape, [`Error::MatchNotFound`] if a `(round, number)`
    /// position is missing or out of order and [`Error::InvalidEntrant`] if
    /// a spot refers to an entrant outside of `entrants`.
    pub fn resume(
        entrants: Entrants<T>,
        matches: Vec<BracketMatch>,
        options: BracketOptions,
    ) -> Result<Self> {
        if matches.len() != TOTAL_MATCHES {
            return Err(Error::InvalidNumberOfMatches {
                expected: TOTAL_MATCHES,
                found: matches.len(),
            });
        }

        for (index, m) in matches.iter().enumerate() {
            if linear_index(m.round, m.number) != Some(index) {
                return Err(Error::MatchNotFound {
                    round: m.round,
                    number: m.number,
                });
            }

            for spot in m.spots {
                if let Spot::Entrant(entrant) = spot {
                    if entrant >= entrants.len() {
                        return Err(Error::InvalidEntrant {
                            index: entrant,
                            length: entrants.len(),
                        });
                    }
                }
            }
        }

        log::debug!(
            "Resuming bracket with {} entrants and {} matches",
            entrants.len(),
            matches.len()
        );

        Ok(Self {
            entrants,
            matches,
            options,
        })
    }

    /// Returns a reference to the entrants of the bracket.
    #[inline]
    pub fn entrants(&self) -> &Entrants<T> {
        &self.entrants
    }

    /// Returns the entrants from the bracket.
    #[inline]
    pub fn into_entrants(self) -> Entrants<T> {
        self.entrants
    }

    /// Returns all matches of the bracket, ordered by round and number.
    #[inline]
    pub fn matches(&self) -> &[BracketMatch] {
        &self.matches
    }

    /// Returns the matches from the bracket.
    #[inline]
    pub fn into_matches(self) -> Vec<BracketMatch> {
        self.matches
    }

    /// Returns all matches of `round`. Returns an empty slice if `round` is
    /// out of range.
    pub fn matches_by_round(&self, round: u32) -> &[BracketMatch] {
        match round_offset(round) {
            Some(offset) => {
                let len = ROUND_SIZES[(round - 1) as usize] as usize;
                &self.matches[offset..offset + len]
            }
            None => &[],
        }
    }

    /// Returns the match at `(round, number)`.
    pub fn match_at(&self, round: u32, number: u32) -> Option<&BracketMatch> {
        let index = linear_index(round, number)?;
        self.matches.get(index)
    }

    /// Assigns the spots of the match at `(round, number)` directly. Used
    /// to populate a manually drawn bracket.
    ///
    /// Any previous scores and winner of the match are discarded. If the
    /// assignment leaves exactly one occupant the match becomes a bye and
    /// the occupant advances immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotFound`] if the match does not exist and
    /// [`Error::InvalidEntrant`] if an index is outside the roster.
    pub fn assign_slots(
        &mut self,
        round: u32,
        number: u32,
        a: Option<usize>,
        b: Option<usize>,
    ) -> Result<()> {
        let index = linear_index(round, number).ok_or(Error::MatchNotFound { round, number })?;

        for entrant in [a, b].into_iter().flatten() {
            if entrant >= self.entrants.len() {
                return Err(Error::InvalidEntrant {
                    index: entrant,
                    length: self.entrants.len(),
                });
            }
        }

        let m = &mut self.matches[index];
        m.spots = [Spot::new(a), Spot::new(b)];
        m.scores = [None, None];
        m.winner = None;
        m.status = MatchStatus::Scheduled;

        if let Some(side) = m.sole_occupant() {
            m.winner = Some(side);
            m.status = MatchStatus::Bye;
            self.advance(index)?;
        }

        Ok(())
    }

    /// Records the result of the match at `(round, number)` and advances
    /// the winner into the next round.
    ///
    /// The lower score wins (stroke play). When both spots are occupied
    /// both scores are required; a match with a single occupant is a bye
    /// and its occupant wins unconditionally, no score needed.
    ///
    /// Recording a result for an already completed match overwrites its
    /// scores and winner and re-runs advancement; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotFound`] if the match does not exist,
    /// [`Error::InvalidScore`] if a required score is missing, the match
    /// has no occupants, or the scores are tied under [`TieBreak::Reject`],
    /// and [`Error::DownstreamMatchMissing`] if the bracket lacks the
    /// placeholder the winner should advance into.
    pub fn record_result(
        &mut self,
        round: u32,
        number: u32,
        score_a: Option<u32>,
        score_b: Option<u32>,
    ) -> Result<RecordOutcome> {
        let index = linear_index(round, number).ok_or(Error::MatchNotFound { round, number })?;
        let m = &self.matches[index];

        // Decide the winner before touching the match so that a rejected
        // result leaves the bracket untouched.
        let (winner, scores, status) = match m.sole_occupant() {
            Some(side) => (side, [None, None], MatchStatus::Bye),
            None => {
                if !m.spots[0].is_entrant() && !m.spots[1].is_entrant() {
                    return Err(Error::InvalidScore("match has no entrants"));
                }

                let a = score_a.ok_or(Error::InvalidScore("missing score for spot A"))?;
                let b = score_b.ok_or(Error::InvalidScore("missing score for spot B"))?;

                let winner = if a < b {
                    Side::A
                } else if b < a {
                    Side::B
                } else {
                    match self.options.tie_break {
                        TieBreak::Reject => {
                            return Err(Error::InvalidScore(
                                "tied scores require a decisive result",
                            ))
                        }
                        TieBreak::SlotA => Side::A,
                    }
                };

                (winner, [Some(a), Some(b)], MatchStatus::Completed)
            }
        };

        let m = &mut self.matches[index];
        m.scores = scores;
        m.winner = Some(winner);
        m.status = status;

        let winner_entrant = m.winner_entrant().unwrap();
        let advanced = m.next_match();

        log::debug!(
            "Match ({}, {}) won by spot {:?} (entrant {})",
            round,
            number,
            winner,
            winner_entrant
        );

        self.advance(index)?;

        Ok(RecordOutcome {
            winner,
            winner_entrant,
            advanced,
        })
    }

    /// Copies the winner of the match at `index` into the spot of the next
    /// round match it feeds. Does nothing for the final or for matches
    /// without a decided winner.
    fn advance(&mut self, index: usize) -> Result<()> {
        let m = &self.matches[index];

        let winner = match m.winner_entrant() {
            Some(winner) => winner,
            None => return Ok(()),
        };

        let (round, number, side) = match m.next_match() {
            Some(next) => next,
            None => return Ok(()),
        };

        let dest = linear_index(round, number)
            .and_then(|i| self.matches.get_mut(i))
            .ok_or(Error::DownstreamMatchMissing { round, number })?;

        log::debug!(
            "Advancing entrant {} into match ({}, {}) spot {:?}",
            winner,
            round,
            number,
            side
        );

        dest.spots[side.index()] = Spot::Entrant(winner);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<u32> {
        (0..n as u32).collect()
    }

    #[test]
    fn test_generate_too_few_entrants() {
        let err = SingleElimination16::generate(Vec::<u32>::new(), BracketOptions::default())
            .unwrap_err();
        assert_eq!(err, Error::InsufficientEntrants { found: 0 });

        let err =
            SingleElimination16::generate(vec![1u32], BracketOptions::default()).unwrap_err();
        assert_eq!(err, Error::InsufficientEntrants { found: 1 });
    }

    #[test]
    fn test_generate_shape() {
        for n in 2..=16 {
            let bracket =
                SingleElimination16::generate(roster(n), BracketOptions::default()).unwrap();

            assert_eq!(bracket.matches().len(), 15);
            assert_eq!(bracket.matches_by_round(1).len(), 8);
            assert_eq!(bracket.matches_by_round(2).len(), 4);
            assert_eq!(bracket.matches_by_round(3).len(), 2);
            assert_eq!(bracket.matches_by_round(4).len(), 1);
        }
    }

    #[test]
    fn test_generate_full_seeded() {
        let bracket = SingleElimination16::generate(roster(16), BracketOptions::default()).unwrap();

        // 1 vs 16, 2 vs 15, ..., 8 vs 9 (0-based: 0 vs 15, ..., 7 vs 8).
        for k in 1..=8u32 {
            let m = bracket.match_at(1, k).unwrap();
            assert_eq!(
                m.spots,
                [Spot::Entrant(k as usize - 1), Spot::Entrant(16 - k as usize)]
            );
            assert_eq!(m.status, MatchStatus::Scheduled);
            assert_eq!(m.winner, None);
        }

        for m in bracket.matches()[8..].iter() {
            assert_eq!(m.spots, [Spot::Tbd, Spot::Tbd]);
            assert_eq!(m.status, MatchStatus::Scheduled);
        }
    }

    #[test]
    fn test_generate_three_entrants_bye() {
        let bracket = SingleElimination16::generate(roster(3), BracketOptions::default()).unwrap();

        let m = bracket.match_at(1, 1).unwrap();
        assert_eq!(m.spots, [Spot::Entrant(0), Spot::Entrant(2)]);
        assert_eq!(m.status, MatchStatus::Scheduled);

        // The middle seed has no opponent: bye, advanced without a score.
        let m = bracket.match_at(1, 2).unwrap();
        assert_eq!(m.spots, [Spot::Entrant(1), Spot::Empty]);
        assert_eq!(m.status, MatchStatus::Bye);
        assert_eq!(m.winner, Some(Side::A));
        assert_eq!(m.scores, [None, None]);

        let m = bracket.match_at(2, 1).unwrap();
        assert_eq!(m.spots, [Spot::Tbd, Spot::Entrant(1)]);

        for number in 3..=8 {
            let m = bracket.match_at(1, number).unwrap();
            assert_eq!(m.spots, [Spot::Empty, Spot::Empty]);
            assert_eq!(m.status, MatchStatus::Scheduled);
        }
    }

    #[test]
    fn test_generate_manual() {
        let opts = BracketOptions {
            seeding: SeedingMode::Manual,
            ..Default::default()
        };
        let mut bracket = SingleElimination16::generate(roster(4), opts).unwrap();

        for number in 1..=8 {
            let m = bracket.match_at(1, number).unwrap();
            assert_eq!(m.spots, [Spot::Empty, Spot::Empty]);
            assert_eq!(m.status, MatchStatus::Scheduled);
        }

        bracket.assign_slots(1, 1, Some(0), Some(1)).unwrap();
        assert_eq!(
            bracket.match_at(1, 1).unwrap().spots,
            [Spot::Entrant(0), Spot::Entrant(1)]
        );

        // Assigning a single occupant declares a bye and advances it.
        bracket.assign_slots(1, 2, Some(2), None).unwrap();
        let m = bracket.match_at(1, 2).unwrap();
        assert_eq!(m.status, MatchStatus::Bye);
        assert_eq!(m.winner, Some(Side::A));
        assert_eq!(
            bracket.match_at(2, 1).unwrap().spots,
            [Spot::Tbd, Spot::Entrant(2)]
        );

        let err = bracket.assign_slots(1, 3, Some(17), None).unwrap_err();
        assert_eq!(err, Error::InvalidEntrant { index: 17, length: 4 });
    }

    #[test]
    fn test_record_result_lower_score_wins() {
        let mut bracket =
            SingleElimination16::generate(roster(16), BracketOptions::default()).unwrap();

        // Seed 1 shoots 70, seed 16 shoots 75: seed 1 advances.
        let outcome = bracket.record_result(1, 1, Some(70), Some(75)).unwrap();
        assert_eq!(outcome.winner, Side::A);
        assert_eq!(outcome.winner_entrant, 0);
        assert_eq!(outcome.advanced, Some((2, 1, Side::A)));

        let m = bracket.match_at(1, 1).unwrap();
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.scores, [Some(70), Some(75)]);
        assert_eq!(m.winner, Some(Side::A));

        assert_eq!(
            bracket.match_at(2, 1).unwrap().spots,
            [Spot::Entrant(0), Spot::Tbd]
        );

        // Even match numbers land in spot B of the next match.
        let outcome = bracket.record_result(1, 2, Some(80), Some(71)).unwrap();
        assert_eq!(outcome.winner, Side::B);
        assert_eq!(outcome.winner_entrant, 14);
        assert_eq!(outcome.advanced, Some((2, 1, Side::B)));

        assert_eq!(
            bracket.match_at(2, 1).unwrap().spots,
            [Spot::Entrant(0), Spot::Entrant(14)]
        );
    }

    #[test]
    fn test_record_result_validation() {
        let mut bracket =
            SingleElimination16::generate(roster(4), BracketOptions::default()).unwrap();

        assert_eq!(
            bracket.record_result(5, 1, Some(1), Some(2)).unwrap_err(),
            Error::MatchNotFound { round: 5, number: 1 }
        );

        assert_eq!(
            bracket.record_result(1, 1, Some(70), None).unwrap_err(),
            Error::InvalidScore("missing score for spot B")
        );

        // Match 3 has no occupants with only 4 entrants.
        assert_eq!(
            bracket.record_result(1, 3, Some(1), Some(2)).unwrap_err(),
            Error::InvalidScore("match has no entrants")
        );

        // A rejected tie leaves the match untouched.
        assert_eq!(
            bracket.record_result(1, 1, Some(72), Some(72)).unwrap_err(),
            Error::InvalidScore("tied scores require a decisive result")
        );
        let m = bracket.match_at(1, 1).unwrap();
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert_eq!(m.scores, [None, None]);
        assert_eq!(m.winner, None);
    }

    #[test]
    fn test_record_result_tie_break_slot_a() {
        let opts = BracketOptions {
            tie_break: TieBreak::SlotA,
            ..Default::default()
        };
        let mut bracket = SingleElimination16::generate(roster(4), opts).unwrap();

        let outcome = bracket.record_result(1, 1, Some(72), Some(72)).unwrap();
        assert_eq!(outcome.winner, Side::A);
        assert_eq!(outcome.winner_entrant, 0);
    }

    #[test]
    fn test_record_result_overwrites() {
        let mut bracket =
            SingleElimination16::generate(roster(16), BracketOptions::default()).unwrap();

        bracket.record_result(1, 1, Some(70), Some(75)).unwrap();
        assert_eq!(
            bracket.match_at(2, 1).unwrap().spots[0],
            Spot::Entrant(0)
        );

        // Re-recording replaces the winner and the downstream spot.
        bracket.record_result(1, 1, Some(77), Some(75)).unwrap();
        let m = bracket.match_at(1, 1).unwrap();
        assert_eq!(m.winner, Some(Side::B));
        assert_eq!(
            bracket.match_at(2, 1).unwrap().spots[0],
            Spot::Entrant(15)
        );
    }

    #[test]
    fn test_record_result_bye_after_manual_assignment() {
        let opts = BracketOptions {
            seeding: SeedingMode::Manual,
            ..Default::default()
        };
        let mut bracket = SingleElimination16::generate(roster(2), opts).unwrap();

        bracket.assign_slots(1, 1, Some(0), Some(1)).unwrap();
        bracket.record_result(1, 1, Some(68), Some(73)).unwrap();

        // Round 2 match 1 now holds only the advanced winner; recording it
        // without scores is a bye win for that entrant.
        let outcome = bracket.record_result(2, 1, None, None).unwrap();
        assert_eq!(outcome.winner, Side::A);
        assert_eq!(outcome.winner_entrant, 0);

        let m = bracket.match_at(2, 1).unwrap();
        assert_eq!(m.status, MatchStatus::Bye);
        assert_eq!(bracket.match_at(3, 1).unwrap().spots[0], Spot::Entrant(0));
    }

    #[test]
    fn test_full_bracket_walkthrough() {
        let mut bracket =
            SingleElimination16::generate(roster(16), BracketOptions::default()).unwrap();

        // Lower seed index always shoots the lower score.
        for number in 1..=8 {
            bracket.record_result(1, number, Some(70), Some(75)).unwrap();
        }
        for number in 1..=4 {
            bracket.record_result(2, number, Some(70), Some(75)).unwrap();
        }
        for number in 1..=2 {
            bracket.record_result(3, number, Some(70), Some(75)).unwrap();
        }

        let outcome = bracket.record_result(4, 1, Some(69), Some(70)).unwrap();
        assert_eq!(outcome.winner_entrant, 0);
        assert_eq!(outcome.advanced, None);

        let m = bracket.match_at(4, 1).unwrap();
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.winner, Some(Side::A));
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let first = SingleElimination16::generate(roster(7), BracketOptions::default()).unwrap();
        let second = SingleElimination16::generate(roster(7), BracketOptions::default()).unwrap();

        assert_eq!(first.matches(), second.matches());
    }

    #[test]
    fn test_resume() {
        let bracket =
            SingleElimination16::generate(roster(16), BracketOptions::default()).unwrap();
        let matches = bracket.matches().to_vec();

        SingleElimination16::resume(
            roster(16).into_iter().collect(),
            matches.clone(),
            BracketOptions::default(),
        )
        .unwrap();

        // Wrong match count.
        assert_eq!(
            SingleElimination16::resume(
                roster(16).into_iter().collect(),
                matches[..14].to_vec(),
                BracketOptions::default(),
            )
            .unwrap_err(),
            Error::InvalidNumberOfMatches {
                expected: 15,
                found: 14
            }
        );

        // Entrant index outside the roster.
        assert_eq!(
            SingleElimination16::resume(
                roster(4).into_iter().collect(),
                matches.clone(),
                BracketOptions::default(),
            )
            .unwrap_err(),
            Error::InvalidEntrant {
                index: 15,
                length: 4
            }
        );

        // Out of order numbering.
        let mut shuffled = matches;
        shuffled.swap(0, 1);
        assert_eq!(
            SingleElimination16::resume(
                roster(16).into_iter().collect(),
                shuffled,
                BracketOptions::default(),
            )
            .unwrap_err(),
            Error::MatchNotFound { round: 1, number: 2 }
        );
    }
}
