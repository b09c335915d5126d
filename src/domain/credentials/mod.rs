//! Provider credentials and their well-formedness rules

mod credential;

pub use credential::{ProviderCredential, MIN_KEY_LEN};
