use std::path::PathBuf;

/// Convenience result type used across brandcard.
pub type CardResult<T> = Result<T, CardError>;

/// Pipeline stage an asset was being loaded for when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStage {
    /// Background image.
    Background,
    /// One entry of the logo strip.
    Logo,
}

impl std::fmt::Display for AssetStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => f.write_str("background"),
            Self::Logo => f.write_str("logo"),
        }
    }
}

/// Top-level error taxonomy used by the render pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// A background or logo file is missing or could not be decoded.
    #[error("failed to load {stage} asset '{}': {source:#}", path.display())]
    AssetLoad {
        /// Offending file.
        path: PathBuf,
        /// Stage the asset belongs to.
        stage: AssetStage,
        /// Underlying IO/decode failure.
        #[source]
        source: anyhow::Error,
    },

    /// A source image reported a zero width or height.
    #[error("invalid source dimensions {width}x{height}")]
    InvalidSourceDimensions {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// The requested output format cannot be encoded.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The font file is missing or not a usable face.
    #[error("failed to load font '{}': {reason}", path.display())]
    FontLoad {
        /// Font file path (may be empty for in-memory faces).
        path: PathBuf,
        /// Human readable failure cause.
        reason: String,
    },

    /// Invalid user-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::UnsupportedFormat`] value.
    pub fn unsupported_format(what: impl Into<String>) -> Self {
        Self::UnsupportedFormat(what.into())
    }

    /// Build a [`CardError::AssetLoad`] value.
    pub fn asset_load(
        path: impl Into<PathBuf>,
        stage: AssetStage,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::AssetLoad {
            path: path.into(),
            stage,
            source: source.into(),
        }
    }

    /// Build a [`CardError::FontLoad`] value.
    pub fn font_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Re-tag an error raised while decoding an asset so it names `path` and `stage`.
    ///
    /// Only opaque [`CardError::Other`] failures are re-tagged; typed errors pass through.
    pub(crate) fn into_asset_load(self, path: impl Into<PathBuf>, stage: AssetStage) -> Self {
        match self {
            Self::Other(source) => Self::asset_load(path, stage, source),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
