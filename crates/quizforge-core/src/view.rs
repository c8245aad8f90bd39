//! Serializable snapshots of a quiz for renderers and app servers.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::quiz::Quiz;
use crate::quizzable::Quizzable;
use crate::value::Value;

/// One question as presented to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    /// Form field name, `q0`, `q1`, ... in response order.
    pub id: String,
    pub prompt: String,
    /// Choices in display order.
    pub choices: Vec<Value>,
    /// Correct answer. Omitted from views sent to quiz takers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    pub points: f64,
}

/// A quiz as presented to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizView {
    pub name: String,
    pub url: String,
    pub threshold: f64,
    pub questions: Vec<QuestionView>,
}

impl QuizView {
    /// Snapshot a quiz, shuffling each question's choices.
    pub fn from_quiz<R: Rng + ?Sized>(quiz: &Quiz, rng: &mut R) -> Self {
        let questions = quiz
            .leaves()
            .into_iter()
            .enumerate()
            .map(|(i, q)| QuestionView {
                id: field_name(i),
                prompt: q.prompt().to_string(),
                choices: q.presented_choices(rng),
                answer: Some(q.answer().clone()),
                points: q.points(),
            })
            .collect();
        Self {
            name: quiz.name().to_string(),
            url: quiz.url().to_string(),
            threshold: quiz.threshold(),
            questions,
        }
    }

    /// The same view with every answer removed.
    pub fn without_answers(&self) -> Self {
        let mut view = self.clone();
        view.questions.iter_mut().for_each(|q| q.answer = None);
        view
    }

    pub fn total(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Write the view as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz view: {}", path.display()))?;
        Ok(())
    }

    /// Load a view written by [`QuizView::save_json`].
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz view: {}", path.display()))?;
        let view = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse quiz view: {}", path.display()))?;
        Ok(view)
    }
}

/// Form field name for the response at `position`.
pub fn field_name(position: usize) -> String {
    format!("q{position}")
}

/// Turn submitted form fields into responses in question order.
///
/// Field values are parsed with [`Value::parse_scalar`], so `"4"` compares
/// equal to the integer choice `4`. Unknown fields are ignored.
pub fn responses_from_fields(
    fields: &HashMap<String, String>,
    count: usize,
) -> Result<Vec<Value>, QuizError> {
    let responses: Vec<Value> = (0..count)
        .filter_map(|i| fields.get(&field_name(i)))
        .map(|raw| Value::parse_scalar(raw))
        .collect();
    if responses.len() != count {
        return Err(QuizError::ArityMismatch {
            expected: count,
            actual: responses.len(),
        });
    }
    Ok(responses)
}
