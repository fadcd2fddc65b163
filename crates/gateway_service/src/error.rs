use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{IdentifierError, Reason};
use scrape::ScrapeError;
use upstream::FetchError;

/// Every way a request can fail; the body of a failed response is always empty
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("missing or mismatched token")]
    Unauthorized,
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    /// Only raised by routes whose body has no room for a reason
    #[error("not visible: {0:?}")]
    NotVisible(Reason),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidQuery(_) | GatewayError::InvalidIdentifier(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Scrape(ScrapeError::AmbiguousRestriction { .. }) => StatusCode::FORBIDDEN,
            GatewayError::Fetch(_) | GatewayError::Scrape(_) | GatewayError::NotVisible(_) => {
                StatusCode::NOT_FOUND
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::Unauthorized => tracing::info!("rejected request with bad token"),
            GatewayError::InvalidQuery(_) | GatewayError::InvalidIdentifier(_) => {
                tracing::info!(error = %self, "invalid request")
            }
            GatewayError::NotVisible(_) | GatewayError::Scrape(ScrapeError::AmbiguousRestriction { .. }) => {
                tracing::info!(error = %self, status = status.as_u16(), "request not served")
            }
            GatewayError::Fetch(_) | GatewayError::Scrape(_) => {
                tracing::error!(error = %self, status = status.as_u16(), "handler failed")
            }
        }
        status.into_response()
    }
}
