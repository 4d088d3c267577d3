use chrono::Utc;
use golfday_api::id::RecordId;
use golfday_api::records::{GolfRecord, RecordKind};
use hyper::Method;

use crate::http::{Request, RequestUri, Response};
use crate::{method, StatusCodeError};

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> crate::http::Result {
    match uri.take_str() {
        None => method!(req, {
            Method::GET => list(req, None).await,
            Method::POST => create(req, None).await,
        }),
        Some("longest") => kind_route(req, RecordKind::Longest).await,
        Some("putting") => kind_route(req, RecordKind::Putting).await,
        Some("nearest") => kind_route(req, RecordKind::Nearest).await,
        Some(part) => {
            let id = part
                .parse()
                .map_err(|_| StatusCodeError::not_found())?;
            let id = RecordId(id);

            method!(req, {
                Method::PUT => update(req, id).await,
                Method::DELETE => delete(req, id).await,
            })
        }
    }
}

async fn kind_route(req: Request, kind: RecordKind) -> crate::http::Result {
    method!(req, {
        Method::GET => list(req, Some(kind)).await,
        Method::POST => create(req, Some(kind)).await,
    })
}

async fn list(req: Request, kind: Option<RecordKind>) -> crate::http::Result {
    let mut records = req.state().store.records().list(kind).await?;

    // Rank the contest: longest drive by value descending, putting and
    // nearest-pin ascending.
    if let Some(kind) = kind {
        records.sort_by(|a, b| {
            let ordering = a.value.total_cmp(&b.value);

            if kind.higher_is_better() {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    Ok(Response::ok().json(&records))
}

async fn create(mut req: Request, kind: Option<RecordKind>) -> crate::http::Result {
    req.require_admin()?;

    let mut record: GolfRecord = req.json().await?;

    // A kind-scoped path overrides whatever the body says.
    if let Some(kind) = kind {
        record.kind = kind;
    }

    if req
        .state()
        .store
        .users()
        .get(record.user_id)
        .await?
        .is_none()
    {
        return Err(StatusCodeError::bad_request()
            .message("unknown user id")
            .into());
    }

    record.created_at = Utc::now();
    record.id = req.state().store.records().insert(&record).await?;

    Ok(Response::created().json(&record))
}

async fn update(mut req: Request, id: RecordId) -> crate::http::Result {
    req.require_admin()?;

    let existing = req
        .state()
        .store
        .records()
        .get(id)
        .await?
        .ok_or_else(StatusCodeError::not_found)?;

    let mut record: GolfRecord = req.json().await?;
    record.id = id;
    record.user_id = existing.user_id;
    record.kind = existing.kind;
    record.created_at = existing.created_at;

    req.state().store.records().update(id, &record).await?;

    Ok(Response::ok().json(&record))
}

async fn delete(req: Request, id: RecordId) -> crate::http::Result {
    req.require_admin()?;

    req.state().store.records().delete(id).await?;

    Ok(Response::no_content())
}
