//! Terrain generation error types.

/// Errors raised before any terrain is generated.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TerrainError {
    /// A generation parameter is outside its accepted range.
    #[error("invalid terrain parameter `{name}`: {reason}")]
    InvalidParams {
        /// Parameter name as it appears in [`TerrainParams`](crate::TerrainParams).
        name: &'static str,
        /// What was wrong with the value.
        reason: String,
    },
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            name,
            reason: reason.into(),
        }
    }
}
