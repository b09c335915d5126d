//! Didactic sequence domain: request, generated document, provider schema,
//! prompt construction and typed edits.

mod document;
mod prompt;
mod request;
mod schema;
mod update;

pub use document::{
    ControlVersion, DbaDetalle, DidacticSequence, EvaluationItem, Indicadores, RecursoLink,
    RubricaRow, SecuenciaFases, SesionDetalle, TallerImprimible,
};
pub use prompt::build_prompt;
pub use request::{sanitize, SequenceRequest};
pub use schema::response_schema;
pub use update::{FaseUpdate, SequenceUpdate};

#[cfg(test)]
pub(crate) use document::tests::complete_response;
