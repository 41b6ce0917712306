use chrono::Duration;
use serde::Serialize;

use quiz_core::model::{AnswerSheet, QuestionPaper};
use quiz_core::time::round_secs;

/// How one question was answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub index: usize,
    pub prompt: String,
    pub response: Option<String>,
    pub answer: String,
    pub correct: bool,
}

/// Final results of a stopped exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamReport {
    pub outcomes: Vec<QuestionOutcome>,
    pub score: usize,
    pub total: usize,
    /// Time taken, rounded to whole seconds.
    pub time_taken_secs: i64,
}

impl ExamReport {
    pub(crate) fn build(paper: &QuestionPaper, sheet: &AnswerSheet, time_taken: Duration) -> Self {
        let outcomes: Vec<_> = paper
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let response = sheet.get(index);
                QuestionOutcome {
                    index,
                    prompt: question.text().to_string(),
                    response: response.map(str::to_string),
                    answer: question.answer().to_string(),
                    correct: question.is_correct(response),
                }
            })
            .collect();
        let score = outcomes.iter().filter(|o| o.correct).count();

        Self {
            total: outcomes.len(),
            outcomes,
            score,
            time_taken_secs: round_secs(time_taken),
        }
    }

    #[must_use]
    pub fn time_taken(&self) -> Duration {
        Duration::seconds(self.time_taken_secs)
    }
}

/// Coarse classification of the time left, for countdown styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Relaxed,
    /// Under five minutes left.
    Warning,
    /// Under one minute left.
    Critical,
}

impl Urgency {
    #[must_use]
    pub fn from_remaining(remaining: Duration) -> Self {
        match round_secs(remaining) {
            secs if secs < 60 => Urgency::Critical,
            secs if secs < 300 => Urgency::Warning,
            _ => Urgency::Relaxed,
        }
    }
}
