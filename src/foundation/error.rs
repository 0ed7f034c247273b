/// Convenience result type used across chartmorph.
pub type MorphResult<T> = Result<T, MorphError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant describes a static configuration problem found once, when a step or story is
/// accepted. Per-frame operations (encoding, interpolation, resolving) never fail.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Invalid step/story configuration (duplicate keys, malformed teleport references).
    #[error("validation error: {0}")]
    Validation(String),

    /// Shape dimensions the codec cannot encode (negative or non-finite values).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors when serializing or deserializing story data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MorphError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`MorphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prefix the message with the location it was found at; wrapped errors pass through.
    pub fn at(self, location: impl std::fmt::Display) -> Self {
        match self {
            Self::Validation(m) => Self::Validation(format!("{location}: {m}")),
            Self::Geometry(m) => Self::Geometry(format!("{location}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{location}: {m}")),
            other @ Self::Other(_) => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
