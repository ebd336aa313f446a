//! Error Taxonomy
//!
//! Every fallible engine operation returns `LogoError`. `kind()` buckets the
//! variants into the three classes the CLI reports on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad template id, harmony rule, pattern or parameter. Fatal to one render.
    Configuration,
    /// Render runtime unavailable or without fonts. Fatal at startup.
    ResourceLoad,
    /// Disk or encoding failure while exporting. Generation state is unaffected.
    Io,
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown harmony rule: {0}")]
    UnknownHarmony(String),

    #[error("Unknown preset palette: {0}")]
    UnknownPreset(String),

    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    #[error("Config written by engine {found}, current is {current}")]
    EngineVersionMismatch { found: String, current: String },

    #[error("Render runtime not initialized")]
    RuntimeNotReady,

    #[error("Font directory not found: {}", .0.display())]
    FontDirMissing(PathBuf),

    #[error("No font faces loaded; pass a font directory or enable system fonts")]
    NoFonts,

    #[error("Rasterizer rejected scene: {0}")]
    Rasterize(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LogoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTemplate(_)
            | Self::UnknownHarmony(_)
            | Self::UnknownPreset(_)
            | Self::UnknownPattern(_)
            | Self::InvalidParams(_)
            | Self::InvalidBatchSize(_)
            | Self::EngineVersionMismatch { .. }
            | Self::Serialization(_) => ErrorKind::Configuration,
            Self::RuntimeNotReady
            | Self::FontDirMissing(_)
            | Self::NoFonts
            | Self::Rasterize(_) => ErrorKind::ResourceLoad,
            Self::Io { .. } | Self::Encoding(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, LogoError>;
