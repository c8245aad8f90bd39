//! quizforge-report: Static HTML pages for quizzes, results and indexes.

pub mod html;
pub mod inline;

pub use html::{
    generate_index_html, generate_quiz_html, generate_result_html, write_index_html,
    write_quiz_html, IndexEntry, PageOptions, PublishKind,
};
