use axum::routing::get;
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Quote intake routes.
///
/// ```text
/// GET   /quotes    list_quotes   (operator token)
/// POST  /quotes    create_quote
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/quotes", get(quotes::list_quotes).post(quotes::create_quote))
}
