mod auth;
mod photos;
mod records;
mod teams;
mod tournaments;
mod users;

use crate::http::{Request, RequestUri};
use crate::StatusCodeError;

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> super::Result {
    match uri.take_str() {
        Some("auth") => auth::route(req, uri).await,
        Some("users") => users::route(req, uri).await,
        Some("tournaments") => tournaments::route(req, uri).await,
        Some("records") => records::route(req, uri).await,
        Some("executive") => teams::route(req, uri).await,
        Some("photos") => photos::route(req, uri).await,
        _ => Err(StatusCodeError::not_found().into()),
    }
}
