//! Deferred execution for the exam deadline.
//!
//! A scheduler runs a [`DeadlineSignal`] once after a delay unless the
//! returned [`DeadlineHandle`] is cancelled first. Firing only posts an
//! event into the owning session's queue; the session applies it on its
//! own thread the next time it is observed.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::error::SessionError;

/// Events a timer may post to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    DeadlineElapsed,
}

/// One-shot notification that a session's deadline has passed.
pub struct DeadlineSignal {
    tx: UnboundedSender<SessionEvent>,
}

impl DeadlineSignal {
    pub(crate) fn new(tx: UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Post the deadline event. Does nothing if the session is gone.
    pub fn fire(self) {
        if self.tx.send(SessionEvent::DeadlineElapsed).is_err() {
            tracing::trace!("deadline fired after its session was dropped");
        }
    }
}

impl fmt::Debug for DeadlineSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeadlineSignal")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Cancellation side of a scheduled deadline.
pub trait DeadlineHandle: Send {
    /// Prevent the signal from firing. Idempotent; harmless after firing.
    fn cancel(&mut self);
}

/// Runs a deadline signal once after a delay.
pub trait DeadlineScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, signal: DeadlineSignal) -> Box<dyn DeadlineHandle>;
}

/// Scheduler backed by a sleeping tokio task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoRuntime` outside a tokio runtime.
    pub fn current() -> Result<Self, SessionError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SessionError::NoRuntime)
    }
}

impl DeadlineScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, signal: DeadlineSignal) -> Box<dyn DeadlineHandle> {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            signal.fire();
        });
        tracing::debug!(?delay, "scheduled exam deadline");
        Box::new(TokioDeadline { task })
    }
}

struct TokioDeadline {
    task: JoinHandle<()>,
}

impl DeadlineHandle for TokioDeadline {
    fn cancel(&mut self) {
        if !self.task.is_finished() {
            tracing::debug!("cancelling exam deadline");
        }
        self.task.abort();
    }
}
