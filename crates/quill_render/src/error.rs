use thiserror::Error;

/// Recoverable misuse of the batching API
///
/// None of these abort a frame; the offending call is skipped and logged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("render mode \"{0}\" is not registered")]
    UnknownRenderMode(String),
    #[error("end_render_batch called without a matching begin_render_batch")]
    UnbalancedBatch,
}
