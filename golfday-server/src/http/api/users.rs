use golfday_api::id::UserId;
use golfday_api::users::User;
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

            method!(req, {
                Method::GET => get(req, id).await,
                Method::PUT => update(req, id).await,
                Method::DELETE => delete(req, id).await,
            })
        }
    }
}

async fn list(req: Request) -> crate::http::Result {
    let users = req.state().store.users().list().await?;

    Ok(Response::ok().json(&users))
}

async fn get(req: Request, id: UserId) -> crate::http::Result {
    let user = req.state().store.users().get(id).await?;

    let user = user.ok_or_else(StatusCodeError::not_found)?;

    Ok(Response::ok().json(&user))
}

async fn create(mut req: Request) -> crate::http::Result {
    req.require_admin()?;

    let mut user: User = req.json().await?;

    user.id = req.state().store.users().insert(&user).await?;

    Ok(Response::created().json(&user))
}

async fn update(mut req: Request, id: UserId) -> crate::http::Result {
    req.require_admin()?;

    if req.state().store.users().get(id).await?.is_none() {
        return Err(StatusCodeError::not_found().into());
    }

    let mut user: User = req.json().await?;
    user.id = id;

    req.state().store.users().update(id, &user).await?;

    Ok(Response::ok().json(&user))
}

async fn delete(req: Request, id: UserId) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.users().delete(id).await?;

    Ok(Response::no_content())
}
