mod debounce;
mod user_auth;

pub use debounce::Debounce;
pub use user_auth::{RequireAdmin, RequireUser};
