pub mod ollama;
pub mod prompts;
pub mod provider;

pub use ollama::OllamaOracle;
pub use prompts::build_enhance_prompt;
pub use provider::{DiagramOracle, OracleError};
