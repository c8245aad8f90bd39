//! quizforge-core: Quiz model, scoring, and question generation.
//!
//! Questions, vocabulary-generated questions and whole quizzes all implement
//! [`Quizzable`], so they score the same way and nest freely. Quizzes are
//! described by a [`QuizDefinition`] (markdown or TOML) and instantiated
//! afresh for every session.

pub mod code;
pub mod definition;
pub mod error;
pub mod markdown;
pub mod question;
pub mod quiz;
pub mod quizzable;
pub mod session;
pub mod value;
pub mod view;
pub mod vocabulary;

pub use code::CodeFormat;
pub use definition::{MarkdownQuiz, QuizDefinition, QuizSource, QuizSpec};
pub use error::QuizError;
pub use question::Question;
pub use quiz::{Item, Quiz, QuizState};
pub use quizzable::{CheckResult, Quizzable, Responses};
pub use session::Session;
pub use value::Value;
pub use view::{QuestionView, QuizView};
pub use vocabulary::{Term, TermSide, Vocabulary, VocabularyQuestion};
