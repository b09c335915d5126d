//! Provider seam for generative backends and error classification.

mod classify;
mod provider;

pub use classify::{classify, ErrorClass};
pub use provider::{GenerativeProvider, ProviderCall};

#[cfg(test)]
pub(crate) use provider::tests::MockProvider;
