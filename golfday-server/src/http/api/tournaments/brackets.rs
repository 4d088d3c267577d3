use golfday_api::id::TournamentId;
use golfday_api::tournaments::brackets::{Bracket, GenerateBracket};
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{bracket, method, StatusCodeError};

pub async fn route(
    req: Request,
    mut uri: RequestUri<'_>,
    tournament_id: TournamentId,
) -> crate::http::Result {
    match uri.take_str() {
        None => method!(req, {
            Method::GET => get(req, tournament_id).await,
            Method::POST => generate(req, tournament_id).await,
        }),
        Some(_) => Err(StatusCodeError::not_found().into()),
    }
}

async fn get(req: Request, tournament_id: TournamentId) -> crate::http::Result {
    let entrants = req.state().store.entrants(tournament_id).list().await?;
    let matches = req.state().store.matches(tournament_id).list().await?;

    if matches.is_empty() {
        return Err(StatusCodeError::not_found()
            .message("tournament has no bracket")
            .into());
    }

    Ok(Response::ok().json(&Bracket { entrants, matches }))
}

/// (Re)generates the bracket. Any previously stored matches and results
/// are discarded.
async fn generate(mut req: Request, tournament_id: TournamentId) -> crate::http::Result {
    req.require_admin()?;

    let body: GenerateBracket = req.json().await?;

    let matches = bracket::generate(&req.state().store, tournament_id, body.options).await?;
    let entrants = req.state().store.entrants(tournament_id).list().await?;

    Ok(Response::created().json(&Bracket { entrants, matches }))
}
