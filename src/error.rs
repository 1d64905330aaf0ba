use thiserror::Error;

/// Errors that abort a draw call.
///
/// Unbound vertex or index arrays are not errors: those draws return
/// `Ok(())` without touching the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("fixed-point division by zero")]
    DivisionByZero,

    #[error("perspective divide by zero w at vertex {index}")]
    ZeroW { index: usize },

    #[error("no vertex function bound")]
    MissingVertexFunction,

    #[error("vertex size must be 2, 3 or 4 (got {0})")]
    InvalidVertexSize(u8),

    #[error("vertex {index} is out of range for a vertex array of {len} elements")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("color {index} is out of range for a color array of {len} elements")]
    ColorOutOfRange { index: usize, len: usize },

    #[error("{count} indices requested but the index array holds {len}")]
    IndexOutOfRange { count: usize, len: usize },

    #[error("viewport {width}x{height} exceeds the fixed-point range")]
    ViewportTooLarge { width: u16, height: u16 },
}
