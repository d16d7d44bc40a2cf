/// Convenience result type used across threadcards.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the layout, rendering and media APIs.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Malformed or unrecognized comment input.
    #[error("parse error: {0}")]
    Parse(String),

    /// Caller-supplied values outside of the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A background, font or file resource could not be loaded.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// A scene or media payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A video could not be positioned at the requested time.
    #[error("seek error: {0}")]
    Seek(String),

    /// Image or video output could not be produced.
    #[error("encode error: {0}")]
    Encode(String),

    /// An internal ordering contract was violated.
    #[error("contract violation: {0}")]
    Contract(String),

    /// Every item of a page/frame batch failed.
    #[error("batch failed: {0}")]
    Batch(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`CardError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`CardError::ResourceLoad`] value.
    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build a [`CardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CardError::Seek`] value.
    pub fn seek(msg: impl Into<String>) -> Self {
        Self::Seek(msg.into())
    }

    /// Build a [`CardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CardError::Contract`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    /// Build a [`CardError::Batch`] value.
    pub fn batch(msg: impl Into<String>) -> Self {
        Self::Batch(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
