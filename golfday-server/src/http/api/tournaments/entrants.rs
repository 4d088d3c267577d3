use golfday_api::id::{EntrantId, TournamentId};
use golfday_api::tournaments::entrants::Entrant;
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{method, StatusCodeError};

pub async fn route(
    req: Request,
    mut uri: RequestUri<'_>,
    tournament_id: TournamentId,
) -> crate::http::Result {
    match uri.take() {
        None => method!(req, {
            Method::GET => list(req, tournament_id).await,
            Method::POST => create(req, tournament_id).await,
        }),
        Some(part) => {
            let id = part.parse()?;

            method!(req, {
                Method::DELETE => delete(req, tournament_id, id).await,
            })
        }
    }
}

async fn list(req: Request, tournament_id: TournamentId) -> crate::http::Result {
    let entrants = req.state().store.entrants(tournament_id).list().await?;

    Ok(Response::ok().json(&entrants))
}

async fn create(mut req: Request, tournament_id: TournamentId) -> crate::http::Result {
    req.require_admin()?;

    let mut entrant: Entrant = req.json().await?;

    // The referenced user must exist.
    if req.state().store.users().get(entrant.user_id).await?.is_none() {
        return Err(StatusCodeError::bad_request()
            .message("unknown user id")
            .into());
    }

    entrant.id = req
        .state()
        .store
        .entrants(tournament_id)
        .insert(&entrant)
        .await?;

    Ok(Response::created().json(&entrant))
}

async fn delete(
    req: Request,
    tournament_id: TournamentId,
    id: EntrantId,
) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.entrants(tournament_id).delete(id).await?;

    Ok(Response::no_content())
}
