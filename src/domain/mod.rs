pub mod audit;
pub mod credentials;
mod error;
pub mod generation;
pub mod llm;
pub mod metrics;
pub mod sequence;
pub mod user;

pub use error::DomainError;
