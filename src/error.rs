use thiserror::Error;

/// Error taxonomy for a single pipeline item.
///
/// `Configuration` covers everything detectable before any network action:
/// a missing or empty required parameter, an undecodable base64 payload, a
/// malformed environment variable. `Transport` covers network and HTTP-layer
/// failures surfaced by the [`crate::contract::Transport`] collaborator.
///
/// Normalisation has no variant here on purpose: the normaliser is total over
/// every shape it may receive and degrades instead of failing.
#[derive(Debug, Error)]
pub enum ApsError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApsError {
    /// Configuration error for a required parameter that resolved empty or absent.
    pub fn missing_parameter(name: &str) -> Self {
        ApsError::Configuration(format!("required parameter '{name}' is missing or empty"))
    }
}

/// Raised when the execution loop aborts: carries the index of the item that
/// failed so the caller can point at the offending input.
#[derive(Debug, Error)]
#[error("item {item_index} failed: {source}")]
pub struct PipelineError {
    pub item_index: usize,
    #[source]
    pub source: ApsError,
}
