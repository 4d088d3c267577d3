use golfday_api::id::TournamentId;
use golfday_api::tournaments::matches::{ResultInput, SlotAssignment};
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{bracket, method, Error, StatusCodeError};

pub async fn route(
    req: Request,
    mut uri: RequestUri<'_>,
    tournament_id: TournamentId,
) -> crate::http::Result {
    match uri.take() {
        None => method!(req, {
            Method::GET => list(req, tournament_id).await,
        }),
        Some(part) => {
            let round = part.parse()?;
            let number = uri.take().ok_or(Error::NotFound)?.parse()?;

            match uri.take_str() {
                None => method!(req, {
                    Method::GET => get(req, tournament_id, round, number).await,
                    Method::PUT => assign(req, tournament_id, round, number).await,
                }),
                Some("result") => method!(req, {
                    Method::POST => record(req, tournament_id, round, number).await,
                }),
                Some(_) => Err(StatusCodeError::not_found().into()),
            }
        }
    }
}

async fn list(req: Request, tournament_id: TournamentId) -> crate::http::Result {
    let matches = match req.query("round") {
        Some(round) => {
            let round = round.parse().map_err(|_| Error::BadRequest)?;
            req.state()
                .store
                .matches(tournament_id)
                .list_round(round)
                .await?
        }
        None => req.state().store.matches(tournament_id).list().await?,
    };

    Ok(Response::ok().json(&matches))
}

async fn get(
    req: Request,
    tournament_id: TournamentId,
    round: u32,
    number: u32,
) -> crate::http::Result {
    let m = req
        .state()
        .store
        .matches(tournament_id)
        .get(round, number)
        .await?;

    let m = m.ok_or_else(StatusCodeError::not_found)?;

    Ok(Response::ok().json(&m))
}

/// Fills the spots of a match in a manually drawn bracket.
async fn assign(
    mut req: Request,
    tournament_id: TournamentId,
    round: u32,
    number: u32,
) -> crate::http::Result {
    req.require_admin()?;

    let assignment: SlotAssignment = req.json().await?;

    let m = bracket::assign_slots(&req.state().store, tournament_id, round, number, assignment)
        .await?;

    Ok(Response::ok().json(&m))
}

/// Records the scores of a match and advances the winner.
async fn record(
    mut req: Request,
    tournament_id: TournamentId,
    round: u32,
    number: u32,
) -> crate::http::Result {
    req.require_admin()?;

    let input: ResultInput = req.json().await?;

    let m = bracket::record_result(&req.state().store, tournament_id, round, number, input)
        .await?;

    Ok(Response::ok().json(&m))
}
