mod progress;
mod report;
mod session;
mod timer;

// Public API of the exam subsystem.
pub use progress::ExamProgress;
pub use report::{ExamReport, QuestionOutcome, Urgency};
pub use session::{ExamSession, ExamStatus, StopCause};
pub use timer::{DeadlineHandle, DeadlineScheduler, DeadlineSignal, TokioScheduler};
