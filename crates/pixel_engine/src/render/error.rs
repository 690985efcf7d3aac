//! Error types for the rendering layer

use crate::render::batch::PrimitiveKey;

/// Errors that can occur while batching or submitting draw work
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend rejected a submission
    #[error("backend submission failed: {0}")]
    Submission(String),

    /// A primitive was placed on a layer the batch was not created with
    #[error("layer {layer} is out of range (batch has {layer_count} layers)")]
    InvalidLayer {
        /// The requested layer
        layer: u8,
        /// Number of layers the batch owns
        layer_count: u8,
    },

    /// A primitive handle did not resolve to a live primitive
    #[error("unknown batch primitive {0:?}")]
    UnknownPrimitive(PrimitiveKey),

    /// A primitive was created with no vertices
    #[error("a primitive requires at least one vertex")]
    EmptyPrimitive,
}
