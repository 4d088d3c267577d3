//! The seam between the bracket engine and the match store.
//!
//! The engine is index based and storage free; this module translates
//! between entrant ids and roster indices, and persists every mutation in
//! a single transaction.

use std::collections::HashMap;

use golfday_api::id::{EntrantId, MatchId, TournamentId};
use golfday_api::tournaments::entrants::Entrant;
use golfday_api::tournaments::matches::{Match, ResultInput, SlotAssignment};
use golfday_api::tournaments::TournamentStatus;
use golfday_core::{
    BracketMatch, BracketOptions, Entrants, Side, SingleElimination16, Spot,
};
use sqlx::{MySql, Transaction};

use crate::store::{id, Store};
use crate::{Error, StatusCodeError};

/// Generates a fresh bracket for the tournament from its entrants and
/// replaces any previously stored matches with the 15 new rows, atomically.
pub async fn generate(
    store: &Store,
    tournament_id: TournamentId,
    options: BracketOptions,
) -> Result<Vec<Match>, Error> {
    let entrants = store.entrants(tournament_id).list().await?;

    let bracket =
        SingleElimination16::generate(entrants.iter().map(|entrant| entrant.id), options)?;

    let mut tx = store.pool.begin().await?;

    sqlx::query(&format!(
        "DELETE FROM {}matches WHERE tournament_id = ?",
        store.table_prefix
    ))
    .bind(tournament_id.0)
    .execute(&mut tx)
    .await?;

    let mut rows = Vec::with_capacity(bracket.matches().len());
    for m in bracket.matches() {
        let row = to_wire(m, &entrants, MatchId(id::MATCH.generate()), tournament_id);

        sqlx::query(&format!(
            "INSERT INTO {}matches (id, tournament_id, round, number, player1, player2, score1, score2, winner, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            store.table_prefix
        ))
        .bind(row.id.0)
        .bind(tournament_id.0)
        .bind(row.round)
        .bind(row.number)
        .bind(row.player1.map(|id| id.0))
        .bind(row.player2.map(|id| id.0))
        .bind(row.score1)
        .bind(row.score2)
        .bind(row.winner.map(|id| id.0))
        .bind(row.status.to_u8())
        .execute(&mut tx)
        .await?;

        rows.push(row);
    }

    tx.commit().await?;

    store
        .tournaments()
        .set_status(tournament_id, TournamentStatus::InProgress)
        .await?;

    log::info!(
        "Generated bracket for tournament {} with {} entrants",
        tournament_id,
        entrants.len()
    );

    Ok(rows)
}

/// Records the result of the match at `(round, number)` and persists the
/// decided match together with the downstream spot the winner advanced
/// into, in one transaction.
pub async fn record_result(
    store: &Store,
    tournament_id: TournamentId,
    round: u32,
    number: u32,
    input: ResultInput,
) -> Result<Match, Error> {
    let (entrants, rows, mut bracket) = resume(store, tournament_id).await?;

    let outcome = bracket.record_result(round, number, input.score1, input.score2)?;

    let mut tx = store.pool.begin().await?;

    let updated = update_row(
        &mut tx,
        store,
        tournament_id,
        &bracket,
        &rows,
        &entrants,
        round,
        number,
    )
    .await?;

    if let Some((next_round, next_number, _)) = outcome.advanced {
        update_row(
            &mut tx,
            store,
            tournament_id,
            &bracket,
            &rows,
            &entrants,
            next_round,
            next_number,
        )
        .await?;
    }

    tx.commit().await?;

    // Deciding the final ends the tournament.
    if round == golfday_core::ROUNDS {
        store
            .tournaments()
            .set_status(tournament_id, TournamentStatus::Completed)
            .await?;
    }

    log::info!(
        "Recorded result for match ({}, {}) of tournament {}",
        round,
        number,
        tournament_id
    );

    Ok(updated)
}

/// Assigns the spots of the match at `(round, number)` in a manually drawn
/// bracket and persists the match (plus the downstream spot, if the
/// assignment produced a bye) in one transaction.
pub async fn assign_slots(
    store: &Store,
    tournament_id: TournamentId,
    round: u32,
    number: u32,
    assignment: SlotAssignment,
) -> Result<Match, Error> {
    let (entrants, rows, mut bracket) = resume(store, tournament_id).await?;

    let index_of = entrant_indices(&entrants);
    let a = resolve(&index_of, assignment.player1)?;
    let b = resolve(&index_of, assignment.player2)?;

    bracket.assign_slots(round, number, a, b)?;

    let mut tx = store.pool.begin().await?;

    let updated = update_row(
        &mut tx,
        store,
        tournament_id,
        &bracket,
        &rows,
        &entrants,
        round,
        number,
    )
    .await?;

    // A single occupant is a bye; its advancement has to be persisted too.
    if let Some(m) = bracket.match_at(round, number) {
        if let (Some(_), Some((next_round, next_number, _))) = (m.winner, m.next_match()) {
            update_row(
                &mut tx,
                store,
                tournament_id,
                &bracket,
                &rows,
                &entrants,
                next_round,
                next_number,
            )
            .await?;
        }
    }

    tx.commit().await?;

    Ok(updated)
}

/// Loads the stored bracket of the tournament and resumes the engine
/// from it.
async fn resume(
    store: &Store,
    tournament_id: TournamentId,
) -> Result<(Vec<Entrant>, Vec<Match>, SingleElimination16<EntrantId>), Error> {
    let entrants = store.entrants(tournament_id).list().await?;
    let rows = store.matches(tournament_id).list().await?;

    if rows.is_empty() {
        return Err(StatusCodeError::not_found()
            .message("tournament has no bracket")
            .into());
    }

    let matches = to_core(&rows, &entrants)?;
    let roster: Entrants<EntrantId> = entrants.iter().map(|entrant| entrant.id).collect();

    let bracket = SingleElimination16::resume(roster, matches, BracketOptions::default())?;

    Ok((entrants, rows, bracket))
}

fn entrant_indices(entrants: &[Entrant]) -> HashMap<EntrantId, usize> {
    entrants
        .iter()
        .enumerate()
        .map(|(index, entrant)| (entrant.id, index))
        .collect()
}

fn resolve(
    index_of: &HashMap<EntrantId, usize>,
    entrant: Option<EntrantId>,
) -> Result<Option<usize>, Error> {
    match entrant {
        Some(id) => match index_of.get(&id) {
            Some(index) => Ok(Some(*index)),
            None => Err(StatusCodeError::bad_request()
                .message("unknown entrant id")
                .into()),
        },
        None => Ok(None),
    }
}

/// Converts stored rows into engine matches. A missing player in round 1
/// is a permanent hole; in later rounds it means the feeding match has not
/// been decided yet.
fn to_core(rows: &[Match], entrants: &[Entrant]) -> Result<Vec<BracketMatch>, Error> {
    let index_of = entrant_indices(entrants);

    let spot = |player: Option<EntrantId>, round: u32| -> Result<Spot, Error> {
        match player {
            Some(id) => match index_of.get(&id) {
                Some(index) => Ok(Spot::Entrant(*index)),
                None => Err(StatusCodeError::conflict()
                    .message("match references an unknown entrant")
                    .into()),
            },
            None if round == 1 => Ok(Spot::Empty),
            None => Ok(Spot::Tbd),
        }
    };

    let mut matches = Vec::with_capacity(rows.len());
    for row in rows {
        let spots = [spot(row.player1, row.round)?, spot(row.player2, row.round)?];

        let winner = match row.winner {
            Some(id) if row.player1 == Some(id) => Some(Side::A),
            Some(id) if row.player2 == Some(id) => Some(Side::B),
            Some(_) => {
                return Err(StatusCodeError::conflict()
                    .message("match winner is not one of its players")
                    .into())
            }
            None => None,
        };

        let mut m = BracketMatch::new(row.round, row.number, spots);
        m.scores = [row.score1, row.score2];
        m.winner = winner;
        m.status = row.status.into();

        matches.push(m);
    }

    Ok(matches)
}

fn to_wire(
    m: &BracketMatch,
    entrants: &[Entrant],
    id: MatchId,
    tournament_id: TournamentId,
) -> Match {
    let player = |spot: Spot| spot.entrant().map(|index| entrants[index].id);

    Match {
        id,
        tournament_id,
        round: m.round,
        number: m.number,
        player1: player(m.spots[0]),
        player2: player(m.spots[1]),
        score1: m.scores[0],
        score2: m.scores[1],
        winner: m.winner_entrant().map(|index| entrants[index].id),
        status: m.status.into(),
    }
}

/// Writes the engine state of the match at `(round, number)` back into its
/// stored row and returns the updated wire form.
#[allow(clippy::too_many_arguments)]
async fn update_row(
    tx: &mut Transaction<'_, MySql>,
    store: &Store,
    tournament_id: TournamentId,
    bracket: &SingleElimination16<EntrantId>,
    rows: &[Match],
    entrants: &[Entrant],
    round: u32,
    number: u32,
) -> Result<Match, Error> {
    let m = bracket
        .match_at(round, number)
        .ok_or_else(|| golfday_core::Error::MatchNotFound { round, number })?;

    let existing = rows
        .iter()
        .find(|row| row.round == round && row.number == number)
        .ok_or_else(|| golfday_core::Error::MatchNotFound { round, number })?;

    let row = to_wire(m, entrants, existing.id, tournament_id);

    sqlx::query(&format!(
        "UPDATE {}matches SET player1 = ?, player2 = ?, score1 = ?, score2 = ?, winner = ?, status = ?
         WHERE tournament_id = ? AND round = ? AND number = ?",
        store.table_prefix
    ))
    .bind(row.player1.map(|id| id.0))
    .bind(row.player2.map(|id| id.0))
    .bind(row.score1)
    .bind(row.score2)
    .bind(row.winner.map(|id| id.0))
    .bind(row.status.to_u8())
    .bind(tournament_id.0)
    .bind(round)
    .bind(number)
    .execute(&mut *tx)
    .await?;

    Ok(row)
}
