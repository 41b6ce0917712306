mod answer_sheet;
mod paper;
mod question;
mod topic;

pub use answer_sheet::AnswerSheet;
pub use paper::QuestionPaper;
pub use question::{Question, QuestionPrompt};
pub use topic::{Topic, UnknownTopic};
