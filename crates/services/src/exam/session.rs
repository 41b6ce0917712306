use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use quiz_core::model::{AnswerSheet, QuestionPaper, QuestionPrompt};
use quiz_core::{Clock, QuestionComposer};

use super::progress::ExamProgress;
use super::report::ExamReport;
use super::timer::{DeadlineHandle, DeadlineScheduler, DeadlineSignal, SessionEvent};
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an exam. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStatus {
    NotStarted,
    Running,
    Stopped,
}

/// What ended a running exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    Explicit,
    Deadline,
}

enum Phase {
    NotStarted,
    Running(RunningExam),
    Stopped(StoppedExam),
}

struct RunningExam {
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    timer: Box<dyn DeadlineHandle>,
    events: UnboundedReceiver<SessionEvent>,
}

#[derive(Debug, Clone, Copy)]
struct StoppedExam {
    started_at: DateTime<Utc>,
    stopped_at: DateTime<Utc>,
    cause: StopCause,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A timed exam over one question paper.
///
/// All state changes happen on the owner's thread. The deadline timer only
/// posts an event; any observing call (`status`, `submit_answer`,
/// `time_remaining`, ...) first applies a pending deadline, and also treats
/// a clock reading at or past the deadline as elapsed. Whichever of the
/// deadline or an explicit [`stop`](Self::stop) is observed first decides
/// the stop timestamp; the other is a no-op.
///
/// Dropping a session stops it and cancels its timer.
pub struct ExamSession {
    clock: Clock,
    scheduler: Arc<dyn DeadlineScheduler>,
    composer: QuestionComposer,
    sheet: Option<AnswerSheet>,
    phase: Phase,
}

impl ExamSession {
    #[must_use]
    pub fn new(scheduler: Arc<dyn DeadlineScheduler>) -> Self {
        Self {
            clock: Clock::default(),
            scheduler,
            composer: QuestionComposer::new(),
            sheet: None,
            phase: Phase::NotStarted,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the composer, e.g. to configure antonyms or arithmetic bounds.
    #[must_use]
    pub fn with_composer(mut self, composer: QuestionComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Names of every topic that can be opted into.
    #[must_use]
    pub fn test_list() -> Vec<&'static str> {
        QuestionComposer::test_list()
    }

    /// Build the question paper and an all-unanswered answer sheet.
    ///
    /// Calling this again before the exam starts returns the existing paper.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` once the exam has started, or
    /// the composer's error for bad topics, count or a missing resource.
    pub fn configure<S: AsRef<str>>(
        &mut self,
        opted_topics: &[S],
        numq: usize,
    ) -> Result<&QuestionPaper, SessionError> {
        self.configure_with_rng(opted_topics, numq, &mut rand::rng())
    }

    /// Like [`configure`](Self::configure) with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn configure_with_rng<S: AsRef<str>, R: Rng>(
        &mut self,
        opted_topics: &[S],
        numq: usize,
        rng: &mut R,
    ) -> Result<&QuestionPaper, SessionError> {
        self.apply_pending();
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(SessionError::AlreadyStarted);
        }

        let paper = self
            .composer
            .gen_question_paper_with_rng(opted_topics, numq, rng)?;
        if self.sheet.is_none() {
            self.sheet = Some(AnswerSheet::new(paper.len()));
        }
        Ok(paper)
    }

    /// Start the exam clock and schedule the deadline `duration` from now.
    ///
    /// Returns `Ok(false)` without any effect if the exam already started:
    /// an exam runs at most once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` for a zero or negative
    /// duration, or one whose deadline cannot be represented, and `SessionError::NotConfigured` if no paper exists yet.
    pub fn start(&mut self, duration: Duration) -> Result<bool, SessionError> {
        if duration <= Duration::zero() {
            return Err(SessionError::InvalidDuration);
        }
        let delay = duration.to_std().map_err(|_| SessionError::InvalidDuration)?;

        self.apply_pending();
        if !matches!(self.phase, Phase::NotStarted) {
            tracing::debug!("start ignored, exam already started");
            return Ok(false);
        }
        if self.sheet.is_none() {
            return Err(SessionError::NotConfigured);
        }

        let started_at = self.clock.now();
        let deadline = started_at
            .checked_add_signed(duration)
            .ok_or(SessionError::InvalidDuration)?;
        let (tx, events) = unbounded_channel();
        let timer = self.scheduler.schedule(delay, DeadlineSignal::new(tx));

        self.phase = Phase::Running(RunningExam {
            started_at,
            deadline,
            timer,
            events,
        });
        tracing::info!(%started_at, %deadline, "exam started");
        Ok(true)
    }

    /// End a running exam now. No-op unless running.
    pub fn stop(&mut self) {
        self.apply_pending();
        if matches!(self.phase, Phase::Running(_)) {
            let now = self.clock.now();
            self.finish(now, StopCause::Explicit);
        }
    }

    /// Record `answer` for question `index`.
    ///
    /// Returns `false`, changing nothing, unless the exam is running and
    /// `index` is on the paper. A `false` while the presentation layer is
    /// still asking questions means time is up.
    pub fn submit_answer(&mut self, index: usize, answer: impl Into<String>) -> bool {
        self.apply_pending();
        if !matches!(self.phase, Phase::Running(_)) {
            tracing::debug!(index, "answer rejected, exam not running");
            return false;
        }
        self.sheet
            .as_mut()
            .is_some_and(|sheet| sheet.record(index, answer.into()))
    }

    /// Whether the stored response for `index` matches the answer key.
    ///
    /// Valid in every state; unanswered questions evaluate to `false`.
    #[must_use]
    pub fn evaluate_answer(&self, index: usize) -> bool {
        let answer = self.sheet.as_ref().and_then(|sheet| sheet.get(index));
        self.composer.evaluate_answer(index, answer)
    }

    pub fn status(&mut self) -> ExamStatus {
        self.apply_pending();
        match self.phase {
            Phase::NotStarted => ExamStatus::NotStarted,
            Phase::Running(_) => ExamStatus::Running,
            Phase::Stopped(_) => ExamStatus::Stopped,
        }
    }

    /// Time left before the deadline; zero unless running.
    pub fn time_remaining(&mut self) -> Duration {
        self.apply_pending();
        match &self.phase {
            Phase::Running(running) => (running.deadline - self.clock.now()).max(Duration::zero()),
            Phase::NotStarted | Phase::Stopped(_) => Duration::zero(),
        }
    }

    /// Time between start and stop; `None` until the exam has stopped.
    pub fn time_taken(&mut self) -> Option<Duration> {
        self.apply_pending();
        match &self.phase {
            Phase::Stopped(stopped) => Some(stopped.stopped_at - stopped.started_at),
            Phase::NotStarted | Phase::Running(_) => None,
        }
    }

    /// What ended the exam, once stopped.
    pub fn stop_cause(&mut self) -> Option<StopCause> {
        self.apply_pending();
        match &self.phase {
            Phase::Stopped(stopped) => Some(stopped.cause),
            Phase::NotStarted | Phase::Running(_) => None,
        }
    }

    /// Text-only view of question `index`.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<QuestionPrompt<'_>> {
        self.composer
            .question_paper()
            .and_then(|paper| paper.get(index))
            .map(|question| question.prompt(index))
    }

    /// Text-only views of the whole paper; empty before `configure`.
    #[must_use]
    pub fn questions(&self) -> Vec<QuestionPrompt<'_>> {
        self.composer
            .question_paper()
            .map(|paper| paper.prompts().collect())
            .unwrap_or_default()
    }

    /// The answer sheet, withheld while the exam is running.
    pub fn answer_sheet(&mut self) -> Option<&AnswerSheet> {
        self.apply_pending();
        if matches!(self.phase, Phase::Running(_)) {
            return None;
        }
        self.sheet.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        let total = self.sheet.as_ref().map_or(0, AnswerSheet::len);
        let answered = self.sheet.as_ref().map_or(0, AnswerSheet::answered);
        ExamProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
        }
    }

    /// Full results including the answer key; only available once stopped.
    pub fn report(&mut self) -> Option<ExamReport> {
        let time_taken = self.time_taken()?;
        let paper = self.composer.question_paper()?;
        let sheet = self.sheet.as_ref()?;
        Some(ExamReport::build(paper, sheet, time_taken))
    }

    /// Apply a deadline that elapsed since the last observation.
    fn apply_pending(&mut self) {
        let Phase::Running(running) = &mut self.phase else {
            return;
        };
        let fired = matches!(running.events.try_recv(), Ok(SessionEvent::DeadlineElapsed));
        if fired || self.clock.now() >= running.deadline {
            let deadline = running.deadline;
            self.finish(deadline, StopCause::Deadline);
        }
    }

    fn finish(&mut self, stopped_at: DateTime<Utc>, cause: StopCause) {
        let phase = std::mem::replace(&mut self.phase, Phase::NotStarted);
        self.phase = match phase {
            Phase::Running(mut running) => {
                running.timer.cancel();
                let stopped = StoppedExam {
                    started_at: running.started_at,
                    stopped_at: stopped_at.max(running.started_at),
                    cause,
                };
                tracing::info!(
                    ?cause,
                    secs = (stopped.stopped_at - stopped.started_at).num_seconds(),
                    "exam stopped"
                );
                Phase::Stopped(stopped)
            }
            other => other,
        };
    }
}

impl Drop for ExamSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match &self.phase {
            Phase::NotStarted => "NotStarted",
            Phase::Running(_) => "Running",
            Phase::Stopped(_) => "Stopped",
        };
        f.debug_struct("ExamSession")
            .field("clock", &self.clock)
            .field("phase", &phase)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
