//! Question paper composition.

mod generators;

use std::path::PathBuf;

use rand::Rng;

use crate::antonyms::Antonyms;
use crate::error::{ComposeError, ResourceError};
use crate::model::{QuestionPaper, Topic};

pub use generators::ArithmeticBounds;

#[derive(Debug, Clone, Default)]
enum AntonymSource {
    #[default]
    Unset,
    Path(PathBuf),
    Loaded(Antonyms),
}

/// Builds one question paper from a set of opted-in topics.
///
/// A composer is single-use: the first successful
/// [`gen_question_paper`](Self::gen_question_paper) call fixes the paper,
/// and every later call returns it unchanged. Compose a new exam with a new
/// composer.
#[derive(Debug, Clone, Default)]
pub struct QuestionComposer {
    bounds: ArithmeticBounds,
    antonyms: AntonymSource,
    paper: Option<QuestionPaper>,
}

impl QuestionComposer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every supported topic, in menu order.
    #[must_use]
    pub fn test_list() -> Vec<&'static str> {
        Topic::ALL.into_iter().map(Topic::name).collect()
    }

    #[must_use]
    pub fn with_arithmetic_bounds(mut self, bounds: ArithmeticBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Read antonyms from `path`, lazily, the first time Opposites is composed.
    #[must_use]
    pub fn with_antonyms_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.antonyms = AntonymSource::Path(path.into());
        self
    }

    /// Use an already loaded mapping.
    #[must_use]
    pub fn with_antonyms(mut self, antonyms: Antonyms) -> Self {
        self.antonyms = AntonymSource::Loaded(antonyms);
        self
    }

    /// The paper built so far, if any.
    #[must_use]
    pub fn question_paper(&self) -> Option<&QuestionPaper> {
        self.paper.as_ref()
    }

    /// Correct answers, index-aligned with the paper.
    #[must_use]
    pub fn answer_key(&self) -> Option<Vec<&str>> {
        self.paper.as_ref().map(QuestionPaper::answer_key)
    }

    /// Compose `numq` questions, each from a topic drawn uniformly from `opted_topics`.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::NoTopics`, `UnknownTopic` or `InvalidCount` for
    /// a bad request, and `ComposeError::MissingResource` if Opposites is
    /// opted in but the antonym mapping is unavailable. No paper is kept on
    /// failure.
    pub fn gen_question_paper<S: AsRef<str>>(
        &mut self,
        opted_topics: &[S],
        numq: usize,
    ) -> Result<&QuestionPaper, ComposeError> {
        self.gen_question_paper_with_rng(opted_topics, numq, &mut rand::rng())
    }

    /// Like [`gen_question_paper`](Self::gen_question_paper) with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`gen_question_paper`](Self::gen_question_paper).
    pub fn gen_question_paper_with_rng<S: AsRef<str>, R: Rng>(
        &mut self,
        opted_topics: &[S],
        numq: usize,
        rng: &mut R,
    ) -> Result<&QuestionPaper, ComposeError> {
        let paper = match self.paper.take() {
            Some(existing) => {
                tracing::debug!("question paper already composed, returning it unchanged");
                existing
            }
            None => self.compose(opted_topics, numq, rng)?,
        };
        Ok(self.paper.insert(paper))
    }

    /// Case-insensitive comparison of `answer` with the key at `index`.
    ///
    /// `None` (unanswered), a missing paper or an out-of-range index all
    /// evaluate to `false`.
    #[must_use]
    pub fn evaluate_answer(&self, index: usize, answer: Option<&str>) -> bool {
        self.paper
            .as_ref()
            .and_then(|paper| paper.get(index))
            .is_some_and(|question| question.is_correct(answer))
    }

    fn compose<S: AsRef<str>, R: Rng>(
        &mut self,
        opted_topics: &[S],
        numq: usize,
        rng: &mut R,
    ) -> Result<QuestionPaper, ComposeError> {
        let topics = parse_topics(opted_topics)?;
        if numq == 0 {
            return Err(ComposeError::InvalidCount);
        }

        let bounds = self.bounds;
        let antonyms = if topics.iter().any(|topic| topic.needs_antonyms()) {
            Some(self.resolve_antonyms()?)
        } else {
            None
        };

        let questions = (0..numq)
            .map(|_| {
                let topic = topics[rng.random_range(0..topics.len())];
                generators::generate(topic, rng, bounds, antonyms)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(?topics, count = questions.len(), "composed question paper");
        Ok(QuestionPaper::new(questions))
    }

    fn resolve_antonyms(&mut self) -> Result<&Antonyms, ResourceError> {
        if let AntonymSource::Path(path) = &self.antonyms {
            let loaded = Antonyms::load(path)?;
            self.antonyms = AntonymSource::Loaded(loaded);
        }
        match &self.antonyms {
            AntonymSource::Loaded(antonyms) if antonyms.is_empty() => Err(ResourceError::Empty),
            AntonymSource::Loaded(antonyms) => Ok(antonyms),
            AntonymSource::Unset | AntonymSource::Path(_) => Err(ResourceError::NotConfigured),
        }
    }
}

/// Validate topic names, collapsing duplicates while keeping first-seen order.
fn parse_topics<S: AsRef<str>>(names: &[S]) -> Result<Vec<Topic>, ComposeError> {
    if names.is_empty() {
        return Err(ComposeError::NoTopics);
    }
    let mut topics = Vec::with_capacity(names.len());
    for name in names {
        let topic: Topic = name.as_ref().parse()?;
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    Ok(topics)
}
