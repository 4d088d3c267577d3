use golfday_api::auth::LoginRequest;
use hyper::header::{HeaderValue, SET_COOKIE};
use hyper::Method;
use serde::Serialize;

use crate::http::{Request, RequestUri, Response};
use crate::{method, StatusCodeError};

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> crate::http::Result {
    match uri.take_str() {
        Some("login") => method!(req, {
            Method::POST => login(req).await,
        }),
        Some("logout") => method!(req, {
            Method::POST => logout(req).await,
        }),
        Some("verify") => method!(req, {
            Method::GET => verify(req).await,
        }),
        _ => Err(StatusCodeError::not_found().into()),
    }
}

#[derive(Clone, Debug, Serialize)]
struct VerifyResponse {
    is_authenticated: bool,
    is_admin: bool,
}

async fn login(mut req: Request) -> crate::http::Result {
    let body: LoginRequest = req.json().await?;

    let token = match req.state().auth.login(&body.password)? {
        Some(token) => token,
        None => {
            return Err(StatusCodeError::unauthorized()
                .message("wrong password")
                .into())
        }
    };

    let cookie = format!(
        "admin-token={}; Path=/; HttpOnly; Max-Age=86400",
        token.as_str()
    );

    log::info!("Admin login succeeded");

    Ok(Response::ok()
        .header(SET_COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .json(&token))
}

async fn logout(_req: Request) -> crate::http::Result {
    Ok(Response::ok().header(
        SET_COOKIE,
        HeaderValue::from_static("admin-token=; Path=/; HttpOnly; Max-Age=0"),
    ))
}

async fn verify(req: Request) -> crate::http::Result {
    let claims = req.require_admin()?;

    Ok(Response::ok().json(&VerifyResponse {
        is_authenticated: claims.is_authenticated,
        is_admin: claims.is_admin,
    }))
}
