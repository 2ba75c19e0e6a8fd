//! Oracle trait
//!
//! An oracle is any external generator (a local model, a remote API) that
//! may rewrite the deterministic diagram. It is consulted once, after
//! synthesis, and everything it can do wrong is recoverable.

use async_trait::async_trait;
use thiserror::Error;

use crate::diagram::{Diagram, Part};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Oracle API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse oracle response: {0}")]
    ParseError(String),
    #[error("Oracle changed the part count: expected {expected}, got {found}")]
    PartCountMismatch { expected: usize, found: usize },
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DiagramOracle: Send + Sync {
    /// Short name used in logs ("ollama", "mock", ...).
    fn name(&self) -> &str;

    /// Offer a replacement for `initial`.
    ///
    /// `Ok(None)` means "keep the deterministic diagram".
    async fn enhance(
        &self,
        initial: &Diagram,
        parts: &[Part],
    ) -> Result<Option<Diagram>, OracleError>;
}
