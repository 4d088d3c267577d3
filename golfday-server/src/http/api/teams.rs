use golfday_api::id::TeamId;
use golfday_api::teams::{ExecutiveTeam, TeamScore};
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{method, StatusCodeError};

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> crate::http::Result {
    match uri.take_str() {
        Some("teams") => match uri.take() {
            None => method!(req, {
                Method::GET => list(req).await,
                Method::POST => create(req).await,
            }),
            Some(part) => {
                let id = part.parse()?;

                match uri.take_str() {
                    Some("score") => method!(req, {
                        Method::POST => score(req, id).await,
                    }),
                    None => method!(req, {
                        Method::GET => get(req, id).await,
                        Method::DELETE => delete(req, id).await,
                    }),
                    Some(_) => Err(StatusCodeError::not_found().into()),
                }
            }
        },
        _ => Err(StatusCodeError::not_found().into()),
    }
}

async fn list(req: Request) -> crate::http::Result {
    let mut teams = req.state().store.teams().list().await?;

    // Standings: posted totals first, lower total wins.
    teams.sort_by_key(|team| team.score.unwrap_or(u32::MAX));

    Ok(Response::ok().json(&teams))
}

async fn get(req: Request, id: TeamId) -> crate::http::Result {
    let team = req.state().store.teams().get(id).await?;

    let team = team.ok_or_else(StatusCodeError::not_found)?;

    Ok(Response::ok().json(&team))
}

async fn create(mut req: Request) -> crate::http::Result {
    req.require_admin()?;

    let mut team: ExecutiveTeam = req.json().await?;

    if !team.is_valid() {
        return Err(StatusCodeError::bad_request()
            .message("a team has between 1 and 3 members")
            .into());
    }

    for user_id in &team.members {
        if req.state().store.users().get(*user_id).await?.is_none() {
            return Err(StatusCodeError::bad_request()
                .message("unknown user id")
                .into());
        }
    }

    team.id = req.state().store.teams().insert(&team).await?;

    Ok(Response::created().json(&team))
}

/// Posts the stroke play total of the team.
async fn score(mut req: Request, id: TeamId) -> crate::http::Result {
    req.require_admin()?;

    let mut team = req
        .state()
        .store
        .teams()
        .get(id)
        .await?
        .ok_or_else(StatusCodeError::not_found)?;

    let body: TeamScore = req.json().await?;

    req.state().store.teams().set_score(id, body.score).await?;
    team.score = Some(body.score);

    Ok(Response::ok().json(&team))
}

async fn delete(req: Request, id: TeamId) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.teams().delete(id).await?;

    Ok(Response::no_content())
}
