/// Convenience result type used across packshot.
pub type PackshotResult<T> = Result<T, PackshotError>;

/// Top-level error taxonomy used by compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum PackshotError {
    /// Source bytes are empty, unreadable, or not a supported raster format.
    #[error("decode error: {0}")]
    Decode(String),

    /// A remote or on-disk source could not be retrieved.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Invalid caller-provided data (spec, options, buffer shapes).
    #[error("validation error: {0}")]
    Validation(String),

    /// The flattened output could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackshotError {
    /// Build a [`PackshotError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PackshotError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`PackshotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PackshotError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Short stable label for logs and fallback reasons.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Fetch(_) => "fetch",
            Self::Validation(_) => "validation",
            Self::Encode(_) => "encode",
            Self::Other(_) => "other",
        }
    }

    /// Whether a best-effort caller may still deliver the background after this error.
    ///
    /// Encoder failures are not: the fallback goes through the same encoder.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

impl From<image::ImageError> for PackshotError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => Self::Decode(e.to_string()),
            image::ImageError::Decoding(e) => Self::Decode(e.to_string()),
            image::ImageError::Encoding(e) => Self::Encode(e.to_string()),
            image::ImageError::Limits(e) => Self::Decode(e.to_string()),
            other => Self::Other(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
