use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while answering a single sitemap request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "error", content = "details")]
pub enum SitemapError {
    /// Unknown sub-sitemap, out-of-range page, unsupported type, or a page on a non-XML type.
    #[serde(rename = "not_found")]
    #[error("Not found: {0}")]
    NotFound(String),

    /// A caller-supplied callback failed.
    #[serde(rename = "callback_failure")]
    #[error("Callback failed: {0}")]
    Callback(String),

    /// A callback produced an entry without a usable path.
    #[serde(rename = "invalid_entry")]
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[serde(rename = "render_failure")]
    #[error("Rendering failed: {0}")]
    Render(String),
}

impl SitemapError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SitemapError::NotFound(_) => StatusCode::NOT_FOUND,
            SitemapError::Callback(_) | SitemapError::InvalidEntry(_) | SitemapError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SitemapError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

/// Error returned by caller-supplied extension points.
///
/// Anything convertible into an `anyhow::Error` converts into this, so callbacks can use `?` freely.
pub struct CallbackError(anyhow::Error);

impl CallbackError {
    pub fn msg<M>(message: M) -> Self
    where
        M: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self(anyhow::Error::msg(message))
    }
}

impl<E> From<E> for CallbackError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Debug for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl From<CallbackError> for SitemapError {
    fn from(err: CallbackError) -> Self {
        SitemapError::Callback(err.to_string())
    }
}
