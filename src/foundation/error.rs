/// Convenience result type used across radarloop.
pub type RadarResult<T> = Result<T, RadarError>;

/// Error taxonomy for a single animation build.
///
/// Every stage of the pipeline aborts the whole build on failure; the message identifies the
/// asset or stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    /// Raster bytes were not a recognized format, or were truncated/corrupt.
    #[error("decode error: {0}")]
    Decode(String),

    /// Layers, sweeps, or frames with incompatible bounds.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// No eligible sweep was found, so no animation can be built.
    #[error("selection error: {0}")]
    Selection(String),

    /// The frame set could not be serialized into an animation.
    #[error("encode error: {0}")]
    Encode(String),

    /// The asset source failed to list or fetch a resource.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RadarError {
    /// Build a [`RadarError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RadarError::DimensionMismatch`] value.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`RadarError::Selection`] value.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Build a [`RadarError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RadarError::Retrieval`] value.
    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    /// Build a [`RadarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Prefix the message with the name of the asset being processed.
    pub fn for_asset(self, asset: &str) -> Self {
        match self {
            Self::Decode(m) => Self::Decode(format!("{asset}: {m}")),
            Self::DimensionMismatch(m) => Self::DimensionMismatch(format!("{asset}: {m}")),
            Self::Selection(m) => Self::Selection(format!("{asset}: {m}")),
            Self::Encode(m) => Self::Encode(format!("{asset}: {m}")),
            Self::Retrieval(m) => Self::Retrieval(format!("{asset}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{asset}: {m}")),
            Self::Other(e) => Self::Other(e.context(asset.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
