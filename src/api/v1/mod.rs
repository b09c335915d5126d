mod sequences;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/sequences", post(sequences::generate))
        .route("/sequences/refine", post(sequences::refine))
        .route("/sequences/export", post(sequences::export))
        .route("/sequences/preview", post(sequences::preview))
}
