#![forbid(unsafe_code)]

pub mod error;
pub mod exam;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use exam::{
    DeadlineHandle, DeadlineScheduler, DeadlineSignal, ExamProgress, ExamReport, ExamSession,
    ExamStatus, QuestionOutcome, StopCause, TokioScheduler, Urgency,
};
