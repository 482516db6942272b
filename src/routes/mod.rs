pub mod health;
pub mod seed;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::health_routes())
        .merge(seed::seed_routes())
}
