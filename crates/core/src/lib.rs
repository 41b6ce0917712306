#![forbid(unsafe_code)]

pub mod antonyms;
pub mod composer;
pub mod error;
pub mod model;
pub mod time;

pub use antonyms::Antonyms;
pub use composer::{ArithmeticBounds, QuestionComposer};
pub use error::{ComposeError, ResourceError};
pub use time::{Clock, ManualClock};
