mod gemini;
mod http_client;

pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait};
