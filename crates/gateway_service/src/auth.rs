use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::form_urlencoded;

use crate::{AppState, GatewayError};

fn query_token(request: &Request) -> Option<String> {
    let query = request.uri().query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

/// Rejects any request whose `token` query parameter does not match the
/// configured secret, before routing or any other processing
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    tracing::info!(method = %request.method(), path = request.uri().path(), "event");
    match query_token(&request) {
        Some(token) if token == state.config().token => next.run(request).await,
        _ => GatewayError::Unauthorized.into_response(),
    }
}
