mod auth;
mod bracket;
mod config;
mod http;
mod logger;
mod state;
mod store;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use hyper::StatusCode;
use thiserror::Error;
use tokio::sync::watch;

pub use config::Config;
pub use state::State;

#[derive(Debug, Parser)]
#[command(author, version, about = "Golf day tournament server")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match Config::from_file(&args.config).await {
        Ok(config) => config.with_environment(),
        Err(config::ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            Config::from_environment()?
        }
        Err(err) => return Err(err.into()),
    };

    logger::init(config.loglevel);
    log::info!("Using config: {:?}", config);

    let state = State::new(config);
    state.store.create_tables().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::task::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {:?}", err);
            return;
        }

        log::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    http::bind(state, shutdown_rx).await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Store(#[from] sqlx::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Hyper(#[from] hyper::Error),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    Bracket(#[from] golfday_core::Error),
    #[error("invalid token")]
    InvalidToken,
    #[error("not found")]
    NotFound,
    #[error("bad request")]
    BadRequest,
    #[error(transparent)]
    StatusCodeError(#[from] StatusCodeError),
}

/// An error that is returned to the client as is, with the given status
/// code and message.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct StatusCodeError {
    pub code: StatusCode,
    pub message: String,
}

impl StatusCodeError {
    pub fn new<T>(code: StatusCode, message: T) -> Self
    where
        T: ToString,
    {
        Self {
            code,
            message: message.to_string(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request")
    }

    /// 401 Unauthorized
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// 403 Forbidden
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden")
    }

    /// 404 Not Found
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// 409 Conflict
    pub fn conflict() -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict")
    }

    /// 411 Length Required
    pub fn length_required() -> Self {
        Self::new(StatusCode::LENGTH_REQUIRED, "Length Required")
    }

    /// 408 Request Timeout
    pub fn request_timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "Request Timeout")
    }

    /// Replaces the message of the error.
    pub fn message<T>(mut self, message: T) -> Self
    where
        T: ToString,
    {
        self.message = message.to_string();
        self
    }
}
