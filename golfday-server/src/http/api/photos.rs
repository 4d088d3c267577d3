use chrono::Utc;
use golfday_api::id::PhotoId;
use golfday_api::photos::Photo;
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::method;

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> crate::http::Result {
    match uri.take() {
        None => method!(req, {
            Method::GET => list(req).await,
            Method::POST => create(req).await,
            Method::DELETE => delete_all(req).await,
        }),
        Some(part) => {
            let id = part.parse()?;

            method!(req, {
                Method::DELETE => delete(req, id).await,
            })
        }
    }
}

async fn list(req: Request) -> crate::http::Result {
    let photos = req.state().store.photos().list().await?;

    Ok(Response::ok().json(&photos))
}

async fn create(mut req: Request) -> crate::http::Result {
    req.require_admin()?;

    let mut photo: Photo = req.json().await?;
    photo.uploaded_at = Utc::now();

    photo.id = req.state().store.photos().insert(&photo).await?;

    Ok(Response::created().json(&photo))
}

async fn delete(req: Request, id: PhotoId) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.photos().delete(id).await?;

    Ok(Response::no_content())
}

async fn delete_all(req: Request) -> crate::http::Result {
    req.require_admin()?;

    let deleted = req.state().store.photos().delete_all().await?;

    log::info!("Deleted {} photos", deleted);

    Ok(Response::no_content())
}
