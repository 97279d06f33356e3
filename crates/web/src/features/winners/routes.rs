use axum::{Router, middleware, routing::get};

use super::handlers::{export_winners_csv, list_winners};
use crate::{
    middleware::auth::{ApiKeys, require_auth},
    state::AppState,
};

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/winners", get(list_winners))
        .route("/winners.csv", get(export_winners_csv))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
