//! Price oracle API
//!
//! - GET /price - Advance and return the default session's price
//! - GET /price?session=<id> - Same, for an isolated per-session walk

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::DEFAULT_SESSION;
use crate::types::PriceQuote;
use crate::AppState;

/// Longest accepted session id.
const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub session: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/price", get(get_price))
}

/// GET /price
async fn get_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceQuote>> {
    let session = match query.session.as_deref() {
        None => DEFAULT_SESSION,
        Some(id) => validate_session_id(id)?,
    };

    let price = state.oracles.tick(session);
    if !price.is_finite() {
        // JSON has no encoding for it; clients would decode null
        return Err(AppError::Internal(format!(
            "oracle {} produced a non-finite price",
            session
        )));
    }
    debug!("GET /price session={} -> {}", session, price);
    Ok(Json(PriceQuote { price }))
}

fn validate_session_id(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(id)
    } else {
        Err(AppError::BadRequest(format!("invalid session id: {:?}", id)))
    }
}
