use std::path::PathBuf;

use thiserror::Error;

use crate::model::UnknownTopic;

/// Problems obtaining the word→antonym mapping used by the Opposites topic.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceError {
    #[error("no antonym source configured")]
    NotConfigured,

    #[error("failed to read antonyms from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed antonym data: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("antonym mapping has no entries")]
    Empty,
}

/// Errors emitted while composing a question paper.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComposeError {
    #[error("at least one topic must be selected")]
    NoTopics,

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("question count must be positive")]
    InvalidCount,

    #[error("missing resource: {0}")]
    MissingResource(#[from] ResourceError),
}

impl ComposeError {
    /// True for caller mistakes in the requested topics or count.
    #[must_use]
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            ComposeError::NoTopics | ComposeError::UnknownTopic(_) | ComposeError::InvalidCount
        )
    }

    #[must_use]
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, ComposeError::MissingResource(_))
    }
}

impl From<UnknownTopic> for ComposeError {
    fn from(err: UnknownTopic) -> Self {
        ComposeError::UnknownTopic(err.0)
    }
}
