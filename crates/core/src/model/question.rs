use serde::Serialize;

/// A generated question together with its correct answer.
///
/// Questions are immutable once generated. The answer never leaves the
/// owning paper except through [`Question::answer`]; consumers that must not
/// see it get a [`QuestionPrompt`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    answer: String,
}

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Case-insensitive exact comparison against the answer.
    ///
    /// An unanswered question (`None`) is never correct.
    #[must_use]
    pub fn is_correct(&self, response: Option<&str>) -> bool {
        response.is_some_and(|r| r.to_uppercase() == self.answer.to_uppercase())
    }

    /// Text-only view of this question at `index` in its paper.
    #[must_use]
    pub fn prompt(&self, index: usize) -> QuestionPrompt<'_> {
        QuestionPrompt {
            index,
            text: &self.text,
        }
    }
}

/// Redacted projection of a [`Question`]: position and text, no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionPrompt<'a> {
    pub index: usize,
    pub text: &'a str,
}
