mod api;

use crate::config::BindAddr;
use crate::{Error, State, StatusCodeError};

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::Future;
use golfday_api::auth::Claims;
use hyper::header::{
    HeaderValue, IntoHeaderName, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_LENGTH, CONTENT_TYPE,
};
use hyper::http::request::Parts;
use hyper::server::conn::Http;
use hyper::service::Service;
use hyper::{Body, HeaderMap, Method, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpSocket, UnixListener};
use tokio::sync::watch;
use tokio::time::Instant;

pub type Result = std::result::Result<Response, Error>;

pub async fn bind(
    state: State,
    shutdown_rx: watch::Receiver<()>,
) -> std::result::Result<(), Error> {
    match state.config.bind.clone() {
        BindAddr::Tcp(addr) => bind_tcp(addr, state, shutdown_rx).await,
        BindAddr::Unix(path) => bind_unix(path, state, shutdown_rx).await,
    }
}

async fn bind_tcp(
    addr: SocketAddr,
    state: State,
    mut shutdown_rx: watch::Receiver<()>,
) -> std::result::Result<(), Error> {
    let service = RootService { state };

    let socket = TcpSocket::new_v4()?;
    if let Err(err) = socket.set_reuseaddr(true) {
        log::warn!("Failed to set SO_REUSEADDR flag: {}", err);
    }

    // Enable SO_REUSEPORT for all supported systems.
    #[cfg(all(unix, not(target_os = "solaris"), not(target_os = "illumos")))]
    if let Err(err) = socket.set_reuseport(true) {
        log::warn!("Failed to set SO_REUSEPORT flag: {}", err);
    }

    socket.bind(addr)?;
    let listener = socket.listen(1024)?;
    log::info!("Listening on {}", addr);

    loop {
        tokio::select! {
            res = listener.accept() => {
                let (stream, addr) = match res {
                    Ok((stream, addr)) => (stream, addr),
                    Err(err) => {
                        log::warn!("Failed to accept connection: {:?}", err);
                        continue;
                    }
                };
                log::info!("Accepting new connection from {:?}", addr);

                spawn_connection(stream, service.clone(), shutdown_rx.clone());
            }
            // Shut down the server.
            _ = shutdown_rx.changed() => {
                log::debug!("Shutting down http server");
                return Ok(());
            }
        }
    }
}

async fn bind_unix(
    path: PathBuf,
    state: State,
    mut shutdown_rx: watch::Receiver<()>,
) -> std::result::Result<(), Error> {
    let service = RootService { state };

    let listener = UnixListener::bind(&path)?;
    log::info!("Listening on {:?}", path);

    loop {
        tokio::select! {
            res = listener.accept() => {
                let stream = match res {
                    Ok((stream, _)) => stream,
                    Err(err) => {
                        log::warn!("Failed to accept connection: {:?}", err);
                        continue;
                    }
                };

                spawn_connection(stream, service.clone(), shutdown_rx.clone());
            }
            _ = shutdown_rx.changed() => {
                log::debug!("Shutting down http server");
                return Ok(());
            }
        }
    }
}

fn spawn_connection<S>(stream: S, service: RootService, mut shutdown_rx: watch::Receiver<()>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::task::spawn(async move {
        let mut conn = Http::new()
            .http1_keep_alive(true)
            .serve_connection(stream, service);

        let mut conn = Pin::new(&mut conn);

        tokio::select! {
            res = &mut conn => {
                if let Err(err) = res {
                    log::warn!("Http error: {:?}", err);
                }
            }
            _ = shutdown_rx.changed() => {
                log::debug!("Shutting down connection");
                conn.graceful_shutdown();
            }
        }
    });
}

#[derive(Clone, Debug)]
struct RootService {
    state: State,
}

impl Service<hyper::Request<Body>> for RootService {
    type Response = hyper::Response<Body>;
    type Error = crate::Error;
    type Future = RootServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    #[inline]
    fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
        RootServiceFuture::new(req, self.state.clone())
    }
}

struct RootServiceFuture(
    BoxFuture<'static, std::result::Result<hyper::Response<Body>, crate::Error>>,
);

impl RootServiceFuture {
    fn new(req: hyper::Request<Body>, state: State) -> Self {
        Self(Box::pin(async move {
            Ok(service_root(req, state).await.unwrap())
        }))
    }
}

impl Future for RootServiceFuture {
    type Output = std::result::Result<hyper::Response<Body>, crate::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let future = unsafe { self.map_unchecked_mut(|this| &mut this.0) };
        future.poll(cx)
    }
}

async fn service_root(
    req: hyper::Request<Body>,
    state: State,
) -> std::result::Result<hyper::Response<Body>, Infallible> {
    log::trace!("Received Request:");
    log::trace!("Head: {} {}", req.method(), req.uri());
    log::trace!("Headers: {:?}", req.headers());

    let req = Request::new(req, state);

    let uri = String::from(req.uri().path());

    let mut uri = RequestUri::new(&uri);

    log::debug!("{:?}", uri);

    let origin = req.headers().get("Origin").cloned();

    let res = match check_payload(req.method(), req.headers()) {
        Ok(()) => match uri.take_str() {
            Some("api") => api::route(req, uri).await,
            _ => Err(Error::NotFound),
        },
        Err(err) => Err(err),
    };

    match res {
        Ok(mut resp) => {
            if let Some(origin) = origin {
                resp = resp.header(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }

            resp = resp.header(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type,authorization"),
            );

            Ok(resp.build())
        }
        Err(err) => {
            let mut resp = Response::ok();

            match err {
                Error::NotFound => {
                    resp = resp.status(StatusCode::NOT_FOUND).body("Not Found");
                }
                Error::BadRequest => {
                    resp = resp.status(StatusCode::BAD_REQUEST).body("Bad Request");
                }
                Error::InvalidToken | Error::Jwt(_) => {
                    resp = resp
                        .status(StatusCode::UNAUTHORIZED)
                        .json(&ErrorResponse {
                            code: StatusCode::UNAUTHORIZED.as_u16(),
                            message: String::from("Unauthorized"),
                        });
                }
                Error::Bracket(err) => {
                    let code = bracket_status(&err);

                    resp = resp.status(code).json(&ErrorResponse {
                        code: code.as_u16(),
                        message: err.to_string(),
                    });
                }
                Error::StatusCodeError(err) => {
                    resp = resp.status(err.code).json(&ErrorResponse {
                        code: err.code.as_u16(),
                        message: err.message,
                    });
                }
                err => {
                    log::error!("{:?}", err);

                    resp = resp
                        .status(StatusCode::INTERNAL_SERVER_ERROR)
                        .body("Internal Server Error");
                }
            }

            Ok(resp.build())
        }
    }
}

/// Maximum accepted request body size in bytes.
const MAX_PAYLOAD_SIZE: u64 = 16384;

/// Rejects bodies the server is not willing to read. Requests that carry a
/// body must declare a well-formed Content-Length within bounds.
fn check_payload(
    method: &Method,
    headers: &HeaderMap<HeaderValue>,
) -> std::result::Result<(), Error> {
    if method != Method::POST && method != Method::PUT {
        return Ok(());
    }

    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(StatusCodeError::length_required)?;

    let length: u64 = value
        .to_str()
        .ok()
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| StatusCodeError::bad_request().message("malformed Content-Length"))?;

    if length > MAX_PAYLOAD_SIZE {
        return Err(
            StatusCodeError::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into(),
        );
    }

    Ok(())
}

/// Maps a bracket engine error to the status code it is reported with.
fn bracket_status(err: &golfday_core::Error) -> StatusCode {
    use golfday_core::Error;

    match err {
        Error::MatchNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InsufficientEntrants { .. }
        | Error::InvalidScore(_)
        | Error::InvalidEntrant { .. } => StatusCode::BAD_REQUEST,
        Error::DownstreamMatchMissing { .. } | Error::InvalidNumberOfMatches { .. } => {
            StatusCode::CONFLICT
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub parts: Parts,
    pub body: Option<Body>,
    state: State,
}

impl Request {
    #[inline]
    fn new(req: hyper::Request<Body>, state: State) -> Self {
        let (parts, body) = req.into_parts();

        Self {
            parts,
            body: Some(body),
            state,
        }
    }

    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        &self.parts.headers
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub async fn json<T>(&mut self) -> std::result::Result<T, Error>
    where
        T: DeserializeOwned,
    {
        const DUR: Duration = Duration::new(30, 0);

        let deadline = Instant::now() + DUR;

        let bytes = tokio::select! {
            res = hyper::body::to_bytes(self.body.take().unwrap()) => {
                res?
            }
            _ = tokio::time::sleep_until(deadline) => {
                log::info!("Client failed to transmit body in {}s, dropping connection", DUR.as_secs());
                return Err(StatusCodeError::request_timeout().into());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => Err(StatusCodeError::new(StatusCode::BAD_REQUEST, err).into()),
        }
    }

    /// Returns the value of the cookie with the given `name`, if present.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        let header = self.headers().get("Cookie")?.to_str().ok()?;
        parse_cookie(header, name)
    }

    /// Returns the value of the query parameter with the given `key`.
    pub fn query(&self, key: &str) -> Option<&str> {
        let query = self.uri().query()?;

        for pair in query.split('&') {
            if let Some((k, v)) = pair.split_once('=') {
                if k == key {
                    return Some(v);
                }
            }
        }

        None
    }

    /// Validates the session token of the request and requires it to grant
    /// admin access. The token is taken from the `admin-token` cookie, or
    /// from a `Bearer` authorization header.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] with status 401 when no valid token is
    /// present and 403 when the token does not grant admin access.
    pub fn require_admin(&self) -> std::result::Result<Claims, Error> {
        let token = match self.cookie("admin-token") {
            Some(token) => token.to_owned(),
            None => {
                let header = self
                    .headers()
                    .get("Authorization")
                    .ok_or_else(StatusCodeError::unauthorized)?;

                header
                    .to_str()
                    .ok()
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .ok_or_else(StatusCodeError::unauthorized)?
                    .to_owned()
            }
        };

        let claims = self.state().auth.validate_token(&token)?;

        if !claims.is_admin {
            return Err(StatusCodeError::forbidden().into());
        }

        Ok(claims)
    }
}

fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for pair in header.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value);
            }
        }
    }

    None
}

#[derive(Copy, Clone, Debug)]
pub struct RequestUri<'a> {
    path: &'a str,
}

impl<'a> RequestUri<'a> {
    pub fn new(mut path: &'a str) -> Self {
        if path.starts_with('/') {
            path = &path[1..];
        }

        Self { path }
    }

    pub fn take(&mut self) -> Option<UriPart> {
        let part = self.take_str()?;

        let part = UriPart { part };

        Some(part)
    }

    pub fn take_str(&mut self) -> Option<&str> {
        if self.path.is_empty() {
            None
        } else {
            Some(match self.path.split_once('/') {
                Some((part, rem)) => {
                    self.path = rem;
                    part
                }
                None => {
                    let path = self.path;
                    self.path = "";
                    path
                }
            })
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct UriPart<'a> {
    part: &'a str,
}

impl<'a> UriPart<'a> {
    pub fn parse<T>(&self) -> std::result::Result<T, Error>
    where
        T: FromStr,
    {
        match self.part.parse() {
            Ok(v) => Ok(v),
            Err(_) => Err(Error::BadRequest),
        }
    }
}

impl<'a> AsRef<str> for UriPart<'a> {
    fn as_ref(&self) -> &str {
        self.part
    }
}

impl<'a> PartialEq<str> for UriPart<'a> {
    fn eq(&self, other: &str) -> bool {
        self.part == other
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// 200 OK
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// 201 Created
    pub fn created() -> Self {
        Self {
            status: StatusCode::CREATED,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn body<T>(mut self, body: T) -> Self
    where
        T: Into<Body>,
    {
        self.body = body.into();
        self
    }

    pub fn json<T>(mut self, body: &T) -> Self
    where
        T: Serialize,
    {
        self.body = Body::from(serde_json::to_vec(body).unwrap());
        self.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    pub fn header<K>(mut self, key: K, value: HeaderValue) -> Self
    where
        K: IntoHeaderName,
    {
        self.headers.append(key, value);
        self
    }

    fn build(self) -> hyper::Response<Body> {
        let mut resp = hyper::Response::new(self.body);
        *resp.status_mut() = self.status;
        *resp.headers_mut() = self.headers;
        resp
    }
}

/// Checks the request method and runs the specified path. If no matching method is found
/// an method_not_allowed error is returned.
#[macro_export]
macro_rules! method {
    ($req:expr, {$($method:expr => $branch:expr),* $(,)?}) => {
        match $req.method() {
            $(
                method if method == $method => $branch,
            )*
            method if method == hyper::Method::OPTIONS => {
                use $crate::http::Response;
                use hyper::header::{HeaderValue, ALLOW, ACCESS_CONTROL_ALLOW_METHODS};

                let allow = vec![$($method.as_str()),*];
                let allow = HeaderValue::from_bytes(allow.join(",").as_bytes()).unwrap();

                Ok(Response::no_content()
                    .header(ALLOW, allow.clone())
                    .header(ACCESS_CONTROL_ALLOW_METHODS, allow))
            }
            _ => Err($crate::StatusCodeError::method_not_allowed().into()),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{check_payload, parse_cookie, RequestUri, CONTENT_LENGTH};

    use crate::Error;

    use hyper::header::{HeaderMap, HeaderValue};
    use hyper::{Method, StatusCode};

    fn assert_status(err: Error, code: StatusCode) {
        match err {
            Error::StatusCodeError(err) => assert_eq!(err.code, code),
            err => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn test_check_payload() {
        let mut headers = HeaderMap::new();

        // Bodyless methods need no Content-Length.
        check_payload(&Method::GET, &headers).unwrap();
        check_payload(&Method::DELETE, &headers).unwrap();

        let err = check_payload(&Method::POST, &headers).unwrap_err();
        assert_status(err, StatusCode::LENGTH_REQUIRED);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("not-a-number"));
        let err = check_payload(&Method::POST, &headers).unwrap_err();
        assert_status(err, StatusCode::BAD_REQUEST);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("999999"));
        let err = check_payload(&Method::PUT, &headers).unwrap_err();
        assert_status(err, StatusCode::PAYLOAD_TOO_LARGE);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("128"));
        check_payload(&Method::POST, &headers).unwrap();
    }

    #[test]
    fn test_request_uri() {
        let mut uri = RequestUri::new("/api/tournaments/123/matches");

        assert_eq!(uri.take_str(), Some("api"));
        assert_eq!(uri.take_str(), Some("tournaments"));
        assert_eq!(uri.take().unwrap().parse::<u64>().unwrap(), 123);
        assert_eq!(uri.take_str(), Some("matches"));
        assert_eq!(uri.take_str(), None);
    }

    #[test]
    fn test_parse_cookie() {
        let header = "session=abc; admin-token=ey.xyz; theme=dark";

        assert_eq!(parse_cookie(header, "admin-token"), Some("ey.xyz"));
        assert_eq!(parse_cookie(header, "session"), Some("abc"));
        assert_eq!(parse_cookie(header, "missing"), None);
    }
}
