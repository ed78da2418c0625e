use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while evaluating a segmentation model.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The serialized model record does not exist.
    #[error("model file not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    /// The model record exists but could not be deserialized into the network.
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode mask {}: {source}", path.display())]
    MaskDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image to {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The dataset directory does not follow the `images/` + `masks/` layout.
    #[error("invalid dataset layout: {0}")]
    Dataset(String),

    /// The model produced an output of unexpected size.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("tensor data conversion failed: {0}")]
    TensorData(String),

    #[error("I/O error: `{0}`")]
    Io(#[from] std::io::Error),

    #[error("CSV error: `{0}`")]
    Csv(#[from] csv::Error),
}

impl EvalError {
    /// Whether the error only concerns a single sample, which the evaluation loop skips.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ImageDecode { .. } | Self::MaskDecode { .. })
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
