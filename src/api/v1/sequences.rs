//! Sequence generation, refinement and export endpoints

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::generation::GenerationOutcome;
use crate::domain::sequence::{DidacticSequence, SequenceRequest, SequenceUpdate};
use crate::infrastructure::export::render_text;

/// POST /v1/sequences. Gated by the per-user debounce window: a second
/// generation inside the window is rejected up front, before any
/// provider attempt or counter is touched. Refinements of a previous
/// result pass the gate.
pub async fn generate(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<GenerationOutcome>, ApiError> {
    if !request.is_refinement() {
        if let Err(wait) = state.debounce.check_and_arm(&user.email) {
            return Err(ApiError::rate_limited(format!(
                "Please wait {}s before generating again",
                wait.as_secs().max(1)
            )));
        }
    }

    info!(email = user.email.as_str(), tema = request.tema.as_str(), "generation requested");

    let outcome = state.orchestrator.generate(request, &user.email).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub sequence: DidacticSequence,
    pub updates: Vec<SequenceUpdate>,
}

/// POST /v1/sequences/refine. Local edits, no provider round trip and
/// no debounce.
pub async fn refine(
    RequireUser(user): RequireUser,
    Json(body): Json<RefineRequest>,
) -> Result<Json<DidacticSequence>, ApiError> {
    let mut sequence = body.sequence;
    for update in body.updates {
        update.apply(&mut sequence)?;
    }

    info!(email = user.email.as_str(), "sequence refined");
    Ok(Json(sequence))
}

/// POST /v1/sequences/export. Returns the Word document as a download.
pub async fn export(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(sequence): Json<DidacticSequence>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.exporter.export(&sequence)?;

    info!(
        email = user.email.as_str(),
        size = bytes.len(),
        "sequence exported"
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"secuencia_didactica.docx\"",
            ),
        ],
        bytes,
    ))
}

/// POST /v1/sequences/preview. Plain-text rendering for quick copies.
pub async fn preview(
    RequireUser(_user): RequireUser,
    Json(sequence): Json<DidacticSequence>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text(&sequence),
    )
}
