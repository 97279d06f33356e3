use axum::{Router, routing::post};

use super::handlers::create_repartition;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/create-repartition", post(create_repartition))
}
