mod brackets;
mod entrants;
mod matches;

use golfday_api::id::TournamentId;
use golfday_api::tournaments::entrants::Entrant;
use golfday_api::tournaments::Tournament;
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{method, StatusCodeError};

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> crate::http::Result {
    match uri.take() {
        None => method!(req, {
            Method::GET => list(req).await,
            Method::POST => create(req).await,
        }),
        Some(part) => {
            let id = part.parse()?;

            // Check if the tournament exists before continuing.
            if req.state().store.tournaments().get(id).await?.is_none() {
                return Err(StatusCodeError::not_found()
                    .message("Invalid tournament id")
                    .into());
            }

            match uri.take_str() {
                Some("entrants") => entrants::route(req, uri, id).await,
                Some("bracket") => brackets::route(req, uri, id).await,
                Some("matches") => matches::route(req, uri, id).await,
                None => method!(req, {
                    Method::GET => get(req, id).await,
                    Method::DELETE => delete(req, id).await,
                }),
                Some(_) => Err(StatusCodeError::not_found().into()),
            }
        }
    }
}

async fn list(req: Request) -> crate::http::Result {
    let tournaments = req.state().store.tournaments().list().await?;

    Ok(Response::ok().json(&tournaments))
}

async fn get(req: Request, id: TournamentId) -> crate::http::Result {
    let tournament = req.state().store.tournaments().get(id).await?;

    let tournament = tournament.ok_or_else(StatusCodeError::not_found)?;

    Ok(Response::ok().json(&tournament))
}

async fn create(mut req: Request) -> crate::http::Result {
    req.require_admin()?;

    let mut tournament: Tournament = req.json().await?;

    tournament.id = req
        .state()
        .store
        .tournaments()
        .insert(&tournament)
        .await?;

    // The participant list doubles as the initial seeding: position in the
    // list is the seed rank.
    for (index, user_id) in tournament.participants.iter().enumerate() {
        let entrant = Entrant {
            id: Default::default(),
            user_id: *user_id,
            seed: index as u32 + 1,
        };

        req.state()
            .store
            .entrants(tournament.id)
            .insert(&entrant)
            .await?;
    }

    Ok(Response::created().json(&tournament))
}

async fn delete(req: Request, id: TournamentId) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.tournaments().delete(id).await?;

    Ok(Response::no_content())
}
