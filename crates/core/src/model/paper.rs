use serde::Serialize;

use super::question::{Question, QuestionPrompt};

/// Ordered, fixed-length sequence of questions for one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPaper {
    questions: Vec<Question>,
}

impl QuestionPaper {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Text-only views of every question, in order.
    pub fn prompts(&self) -> impl Iterator<Item = QuestionPrompt<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| question.prompt(index))
    }

    /// Correct answers, index-aligned with the questions.
    #[must_use]
    pub fn answer_key(&self) -> Vec<&str> {
        self.questions.iter().map(Question::answer).collect()
    }
}
