//! Markdown quiz grammar.
//!
//! ```text
//! # Optional title
//!
//! Q: 1+1?
//!
//! * 2
//! * 3
//! * 4
//! ```
//!
//! A `Q:` line starts a question. The first list after it holds the choices,
//! correct answer first. Bullets (`-`, `*`, `+`) and ordered markers (`1.`,
//! `1)`) are recognised. Blank lines inside a list are allowed; any other
//! text closes it. Everything that is neither a `Q:` line nor part of a
//! question's first list is treated as commentary and skipped.

use crate::error::QuizError;
use crate::question::Question;
use crate::value::Value;

/// A parsed markdown quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownDocument {
    /// Text of a `# heading` appearing before the first question.
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Waiting,
    Open,
    Closed,
}

struct PendingQuestion {
    line: usize,
    prompt: String,
    choices: Vec<Value>,
    list: ListState,
}

impl PendingQuestion {
    fn finish(self) -> Result<Question, QuizError> {
        if self.choices.len() < 2 {
            return Err(QuizError::malformed(
                self.line,
                format!(
                    "question '{}' needs a list of at least 2 choices, found {}",
                    self.prompt,
                    self.choices.len()
                ),
            ));
        }
        Question::new(self.prompt, self.choices)
    }
}

/// Return the item text if `line` (already trimmed) is a list item.
fn list_item(line: &str) -> Option<&str> {
    let rest = if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('+'))
    {
        rest
    } else {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        line[digits..]
            .strip_prefix('.')
            .or_else(|| line[digits..].strip_prefix(')'))?
    };

    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Parse a markdown quiz.
pub fn parse_document(source: &str) -> Result<MarkdownDocument, QuizError> {
    let mut title = None;
    let mut questions = Vec::new();
    let mut pending: Option<PendingQuestion> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if let Some(prompt) = line.strip_prefix("Q:") {
            if let Some(done) = pending.take() {
                questions.push(done.finish()?);
            }
            let prompt = prompt.trim();
            if prompt.is_empty() {
                return Err(QuizError::malformed(line_no, "question has no prompt"));
            }
            pending = Some(PendingQuestion {
                line: line_no,
                prompt: prompt.to_string(),
                choices: Vec::new(),
                list: ListState::Waiting,
            });
            continue;
        }

        let Some(current) = pending.as_mut() else {
            if title.is_none() && questions.is_empty() {
                if let Some(heading) = line.strip_prefix("# ") {
                    title = Some(heading.trim().to_string());
                }
            }
            continue;
        };

        match (list_item(line), current.list) {
            (Some(_), ListState::Closed) => {
                tracing::debug!(line = line_no, "skipping list item after the choice list");
            }
            (Some(item), _) => {
                if item.is_empty() {
                    return Err(QuizError::malformed(line_no, "empty choice"));
                }
                current.choices.push(Value::parse_scalar(item));
                current.list = ListState::Open;
            }
            (None, ListState::Open) if !line.is_empty() => current.list = ListState::Closed,
            (None, _) => {}
        }
    }

    if let Some(done) = pending {
        questions.push(done.finish()?);
    }

    Ok(MarkdownDocument { title, questions })
}

/// Parse only the questions of a markdown quiz.
pub fn parse_questions(source: &str) -> Result<Vec<Question>, QuizError> {
    parse_document(source).map(|doc| doc.questions)
}

/// Render questions back into the grammar accepted by [`parse_document`].
pub fn render_markdown(title: Option<&str>, questions: &[Question]) -> String {
    let mut md = String::new();
    if let Some(title) = title {
        md.push_str(&format!("# {title}\n\n"));
    }
    let blocks: Vec<String> = questions.iter().map(Question::to_markdown).collect();
    md.push_str(&blocks.join("\n"));
    md
}
