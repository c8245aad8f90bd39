//! Multiple-choice questions.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{check_threshold, QuizError};
use crate::quizzable::{CheckResult, Quizzable, DEFAULT_THRESHOLD};
use crate::value::Value;

/// Custom correctness predicate. Receives the responses given to the question.
pub type Checker = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// A prompt with an ordered set of choices.
///
/// `choices[0]` is the correct answer. Shuffling only ever happens on copies
/// handed out for presentation, so checking always compares against the
/// original answer value rather than a position.
#[derive(Clone)]
pub struct Question {
    prompt: String,
    choices: Vec<Value>,
    points: f64,
    threshold: f64,
    checker: Option<Checker>,
    outcome: Option<bool>,
}

impl Question {
    /// Create a question worth one point.
    ///
    /// Text choices are read with [`Value::parse_scalar`], the same way typed
    /// and form responses are, so a term named `1066` is stored as the
    /// integer it will be answered with. Prompts and choices must fit on one
    /// line.
    pub fn new(prompt: impl Into<String>, choices: Vec<Value>) -> Result<Self, QuizError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuizError::invalid_question(&prompt, "prompt is empty"));
        }
        if prompt.contains(['\n', '\r']) {
            return Err(QuizError::invalid_question(&prompt, "prompt spans several lines"));
        }
        if choices.len() < 2 {
            return Err(QuizError::invalid_question(
                &prompt,
                format!("needs at least 2 choices, got {}", choices.len()),
            ));
        }
        let choices = choices
            .into_iter()
            .map(|choice| normalize_choice(&prompt, choice))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            prompt,
            choices,
            points: 1.0,
            threshold: DEFAULT_THRESHOLD,
            checker: None,
            outcome: None,
        })
    }

    /// Weight this question. Points must be positive and finite.
    pub fn with_points(mut self, points: f64) -> Result<Self, QuizError> {
        if !points.is_finite() || points <= 0.0 {
            return Err(QuizError::invalid_question(
                &self.prompt,
                format!("points must be positive, got {points}"),
            ));
        }
        self.points = points;
        Ok(self)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, QuizError> {
        self.threshold = check_threshold(threshold)?;
        Ok(self)
    }

    /// Replace equality checking with a custom predicate.
    pub fn with_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.checker = Some(Arc::new(checker));
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Choices in authored order, answer first.
    pub fn choices(&self) -> &[Value] {
        &self.choices
    }

    pub fn answer(&self) -> &Value {
        &self.choices[0]
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn has_custom_checker(&self) -> bool {
        self.checker.is_some()
    }

    /// Whether the last check was correct. `None` before any check.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    /// Choices in a random order for display.
    pub fn presented_choices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        let mut choices = self.choices.clone();
        choices.shuffle(rng);
        choices
    }

    /// `n` unchecked copies of this question.
    pub fn repeat(&self, n: usize) -> Vec<Question> {
        (0..n).map(|_| self.fresh()).collect()
    }

    /// Copy without the recorded outcome.
    pub fn fresh(&self) -> Question {
        Question {
            outcome: None,
            ..self.clone()
        }
    }

    pub(crate) fn reset(&mut self) {
        self.outcome = None;
    }

    /// Render in the `Q:` markdown grammar.
    pub fn to_markdown(&self) -> String {
        let mut md = format!("Q: {}\n\n", self.prompt);
        for choice in &self.choices {
            md.push_str(&format!("* {choice}\n"));
        }
        md
    }

    fn is_correct(&self, responses: &[Value]) -> bool {
        match &self.checker {
            Some(checker) => checker(responses),
            None => responses.first() == Some(self.answer()),
        }
    }
}

fn normalize_choice(prompt: &str, choice: Value) -> Result<Value, QuizError> {
    match choice {
        Value::Text(text) => {
            if text.contains(['\n', '\r']) {
                return Err(QuizError::invalid_question(
                    prompt,
                    format!("choice '{}' spans several lines", text.trim()),
                ));
            }
            match Value::parse_scalar(&text) {
                Value::Text(t) if t.is_empty() => {
                    Err(QuizError::invalid_question(prompt, "choice is empty"))
                }
                value => Ok(value),
            }
        }
        Value::Number(n) if !n.is_finite() => Err(QuizError::invalid_question(
            prompt,
            format!("choice {n} is not a finite number"),
        )),
        value => Ok(value),
    }
}

impl Quizzable for Question {
    fn arity(&self) -> usize {
        1
    }

    fn check_responses(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError> {
        if responses.len() != 1 {
            return Err(QuizError::ArityMismatch {
                expected: 1,
                actual: responses.len(),
            });
        }
        let correct = self.is_correct(responses);
        tracing::debug!(prompt = %self.prompt, correct, "checked question");
        self.outcome = Some(correct);
        Ok(self.result())
    }

    fn score(&self) -> f64 {
        match self.outcome {
            Some(true) => self.points,
            _ => 0.0,
        }
    }

    fn total(&self) -> f64 {
        self.points
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("prompt", &self.prompt)
            .field("choices", &self.choices)
            .field("points", &self.points)
            .field("threshold", &self.threshold)
            .field("checker", &self.checker.as_ref().map(|_| "<fn>"))
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Questions compare by content. Checkers and outcomes are ignored.
impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.prompt == other.prompt && self.choices == other.choices && self.points == other.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arithmetic() -> Question {
        Question::new("2+2?", vec![4.into(), 3.into(), 5.into()]).unwrap()
    }

    #[test]
    fn correct_answer_passes() {
        let mut q = arithmetic();
        let r = q.check(4).unwrap();
        assert_eq!(
            r,
            CheckResult {
                score: 1.0,
                total: 1.0,
                passed: true
            }
        );
    }

    #[test]
    fn wrong_answer_fails() {
        let mut q = arithmetic();
        let r = q.check(3).unwrap();
        assert_eq!(r.score, 0.0);
        assert_eq!(r.total, 1.0);
        assert!(!r.passed);
    }

    #[test]
    fn any_non_answer_fails() {
        for response in [Value::from(3), Value::from(5), Value::from("4"), Value::from(4.5)] {
            let mut q = arithmetic();
            assert!(!q.check(response).unwrap().passed);
        }
    }

    #[test]
    fn unchecked_question_scores_zero() {
        let q = arithmetic();
        assert_eq!(q.score(), 0.0);
        assert_eq!(q.total(), 1.0);
        assert!(!q.passed());
        assert_eq!(q.outcome(), None);
    }

    #[test]
    fn fewer_than_two_choices_is_invalid() {
        let err = Question::new("Lonely?", vec!["yes".into()]).unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestion { .. }));
    }

    #[test]
    fn blank_prompt_is_invalid() {
        assert!(Question::new("  ", vec![1.into(), 2.into()]).is_err());
    }

    #[test]
    fn numeric_text_choices_match_typed_responses() {
        let mut q = Question::new("Battle of Hastings?", vec!["1066".into(), " 1492 ".into()])
            .unwrap();
        assert_eq!(q.choices(), &[Value::Integer(1066), Value::Integer(1492)]);
        assert!(q.check(Value::parse_scalar("1066")).unwrap().passed);
    }

    #[test]
    fn multiline_or_blank_parts_are_invalid() {
        let two = || vec![Value::from("a"), Value::from("b")];
        assert!(Question::new("line one\nline two", two()).is_err());
        assert!(Question::new("Pick", vec!["a".into(), "b\nc".into()]).is_err());
        assert!(Question::new("Pick", vec!["a".into(), "   ".into()]).is_err());
        assert!(Question::new("Pick", vec!["a".into(), f64::NAN.into()]).is_err());
        assert_eq!(Question::new("  Pick  ", two()).unwrap().prompt(), "Pick");
    }

    #[test]
    fn custom_checker_overrides_equality() {
        let mut q = Question::new("Name an even number", vec![2.into(), 3.into()])
            .unwrap()
            .with_checker(|rs| matches!(rs.first(), Some(Value::Integer(i)) if i % 2 == 0));
        assert!(q.check(10).unwrap().passed);
        assert!(!q.check(2.5).unwrap().passed);
        assert!(!q.check(7).unwrap().passed);
    }

    #[test]
    fn points_weight_the_score() {
        let mut q = arithmetic().with_points(3.0).unwrap();
        assert_eq!(q.check(4).unwrap().score, 3.0);
        assert!(arithmetic().with_points(0.0).is_err());
        assert!(arithmetic().with_points(f64::INFINITY).is_err());
    }

    #[test]
    fn arity_mismatch_on_sequences() {
        let mut q = arithmetic();
        let err = q.check(vec![Value::from(4), Value::from(4)]).unwrap_err();
        assert_eq!(
            err,
            QuizError::ArityMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert!(q.check(vec![Value::from(4)]).unwrap().passed);
    }

    #[test]
    fn shuffled_presentation_keeps_answer_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = arithmetic();
        for _ in 0..10 {
            let shown = q.presented_choices(&mut rng);
            assert_eq!(shown.len(), 3);
            assert!(shown.contains(&Value::Integer(4)));
        }
        assert_eq!(q.answer(), &Value::Integer(4));
        assert!(q.check(4).unwrap().passed);
    }

    #[test]
    fn repeat_gives_fresh_copies() {
        let mut q = arithmetic();
        q.check(4).unwrap();
        let copies = q.repeat(3);
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|c| c.outcome().is_none() && *c == q));
    }

    #[test]
    fn markdown_rendering() {
        assert_eq!(arithmetic().to_markdown(), "Q: 2+2?\n\n* 4\n* 3\n* 5\n");
    }
}
