pub mod health;
pub mod quotes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /quotes    create (POST), list (GET, operator only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(quotes::router())
}
