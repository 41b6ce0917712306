use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

/// A category of question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    Addition,
    Subtraction,
    Multiplication,
    Opposites,
}

impl Topic {
    /// Every supported topic, in menu order.
    pub const ALL: [Topic; 4] = [
        Topic::Addition,
        Topic::Subtraction,
        Topic::Multiplication,
        Topic::Opposites,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Topic::Addition => "Addition",
            Topic::Subtraction => "Subtraction",
            Topic::Multiplication => "Multiplication",
            Topic::Opposites => "Opposites",
        }
    }

    /// Whether generating this topic requires the antonym mapping.
    #[must_use]
    pub fn needs_antonyms(self) -> bool {
        matches!(self, Topic::Opposites)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|topic| topic.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}
