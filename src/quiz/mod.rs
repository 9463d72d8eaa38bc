pub mod answer;
pub mod engine;
pub mod flavor;

pub use engine::{AnswerOutcome, QuizCommand, QuizEngine, QuizEvent, QuizStatus};
pub use flavor::Flavor;
