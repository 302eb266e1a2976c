use thiserror::Error;

pub type Result<T> = std::result::Result<T, PosteriorError>;

#[derive(Debug, Error)]
pub enum PosteriorError {
    /// The persisted fit is absent or can't be deserialized
    #[error("failed to load posterior fit {path}: {source}")]
    Load {
        path: Box<str>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A requested variable is not in the fit
    #[error("no variable `{key}` in the posterior fit")]
    MissingKey { key: Box<str> },

    /// Unrecognized selector or out-of-range parameter
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Arrays that should line up don't
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl PosteriorError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
