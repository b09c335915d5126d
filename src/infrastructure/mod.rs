pub mod audit;
pub mod auth;
pub mod export;
pub mod llm;
pub mod logging;
pub mod user;
