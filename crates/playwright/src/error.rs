//! Error types for the Playwright render session

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaywrightError {
    #[error("Playwright not found. Install with: npm i -D playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Static server failed to start: {0}")]
    ServerStartup(String),

    #[error("Render session not initialized")]
    NotInitialized,

    #[error("Harness failed (exit {status}): {message}")]
    Harness { status: String, message: String },

    #[error("Harness output could not be parsed: {0}")]
    MalformedOutput(String),

    #[error("Harness returned {actual} page(s) for {expected} route(s)")]
    RouteCountMismatch { expected: usize, actual: usize },

    #[error("Harness returned route {actual} where {expected} was expected")]
    RouteMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlaywrightResult<T> = Result<T, PlaywrightError>;

impl From<PlaywrightError> for prerender_common::Error {
    fn from(e: PlaywrightError) -> Self {
        prerender_common::Error::RenderSession(e.to_string())
    }
}
