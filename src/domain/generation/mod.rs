//! Generation orchestration: credential ordering, model fallback and
//! per-attempt bookkeeping.

mod orchestrator;

pub use orchestrator::{GenerationOutcome, Orchestrator};
