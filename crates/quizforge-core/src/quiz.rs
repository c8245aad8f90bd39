//! Quizzes: named, addressable collections of quizzables.
//!
//! A quiz scores by summing its children. Responses are aligned to
//! [`Quiz::leaves`], which flattens nested quizzes in order.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::definition::QuizDefinition;
use crate::error::{check_threshold, QuizError};
use crate::question::Question;
use crate::quizzable::{CheckResult, Quizzable, DEFAULT_THRESHOLD};
use crate::value::Value;
use crate::vocabulary::{Vocabulary, VocabularyQuestion};

/// A child of a quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Question(Question),
    Vocabulary(VocabularyQuestion),
    Quiz(Quiz),
}

impl Item {
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Question>) {
        match self {
            Item::Question(q) => out.push(q),
            Item::Vocabulary(v) => out.push(v.question()),
            Item::Quiz(quiz) => quiz.items.iter().for_each(|i| i.collect_leaves(out)),
        }
    }

    fn reset(&mut self) {
        match self {
            Item::Question(q) => q.reset(),
            Item::Vocabulary(v) => v.question_mut().reset(),
            Item::Quiz(quiz) => quiz.reset(),
        }
    }
}

impl From<Question> for Item {
    fn from(q: Question) -> Self {
        Item::Question(q)
    }
}

impl From<VocabularyQuestion> for Item {
    fn from(v: VocabularyQuestion) -> Self {
        Item::Vocabulary(v)
    }
}

impl From<Quiz> for Item {
    fn from(q: Quiz) -> Self {
        Item::Quiz(q)
    }
}

impl Quizzable for Item {
    fn arity(&self) -> usize {
        match self {
            Item::Question(q) => q.arity(),
            Item::Vocabulary(v) => v.arity(),
            Item::Quiz(q) => q.arity(),
        }
    }

    fn check_responses(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError> {
        match self {
            Item::Question(q) => q.check_responses(responses),
            Item::Vocabulary(v) => v.check_responses(responses),
            Item::Quiz(q) => q.check_responses(responses),
        }
    }

    fn score(&self) -> f64 {
        match self {
            Item::Question(q) => q.score(),
            Item::Vocabulary(v) => v.score(),
            Item::Quiz(q) => q.score(),
        }
    }

    fn total(&self) -> f64 {
        match self {
            Item::Question(q) => q.total(),
            Item::Vocabulary(v) => v.total(),
            Item::Quiz(q) => q.total(),
        }
    }

    fn threshold(&self) -> f64 {
        match self {
            Item::Question(q) => q.threshold(),
            Item::Vocabulary(v) => v.threshold(),
            Item::Quiz(q) => q.threshold(),
        }
    }
}

/// Where a quiz instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    Unstarted,
    /// Some, but not all, responses submitted. Interactive sessions only.
    InProgress,
    Completed,
}

/// A named quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    name: String,
    url: String,
    threshold: f64,
    items: Vec<Item>,
    vocabulary: Option<Vocabulary>,
    state: QuizState,
    pending: Vec<Option<Value>>,
}

impl Quiz {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        let name = name.into();
        let url = format!("/{}", slugify(&name));
        let arity = items.iter().map(Quizzable::arity).sum();
        Self {
            name,
            url,
            threshold: DEFAULT_THRESHOLD,
            items,
            vocabulary: None,
            state: QuizState::Unstarted,
            pending: vec![None; arity],
        }
    }

    /// Build a fresh instance from an author's definition.
    ///
    /// Runs the definition's producers again, so vocabulary-backed quizzes
    /// come out re-randomized while plain ones are structurally identical.
    pub fn instantiate(
        definition: &dyn QuizDefinition,
        rng: &mut dyn RngCore,
    ) -> Result<Self, QuizError> {
        let terms = definition.terms();
        let vocabulary = Vocabulary::from_terms(terms)?;
        let items = definition.questions(&vocabulary, rng)?;
        tracing::debug!(
            quiz = definition.name(),
            items = items.len(),
            terms = vocabulary.len(),
            "instantiated quiz"
        );
        let mut quiz = Quiz::new(definition.name(), items)
            .with_url(definition.url())
            .with_threshold(definition.threshold())?;
        if !vocabulary.is_empty() {
            quiz.vocabulary = Some(vocabulary);
        }
        Ok(quiz)
    }

    /// Route for this quiz. A leading `/` is added when missing.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = if url.starts_with('/') {
            url
        } else {
            format!("/{url}")
        };
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, QuizError> {
        self.threshold = check_threshold(threshold)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// All questions in response order, nested quizzes flattened.
    pub fn leaves(&self) -> Vec<&Question> {
        let mut out = Vec::with_capacity(self.pending.len());
        for item in &self.items {
            item.collect_leaves(&mut out);
        }
        out
    }

    /// Responses recorded so far, one slot per leaf.
    pub fn responses(&self) -> &[Option<Value>] {
        &self.pending
    }

    pub fn answered(&self) -> usize {
        self.pending.iter().filter(|r| r.is_some()).count()
    }

    /// Record one response interactively.
    ///
    /// Once every leaf has a response the quiz is checked and completes.
    /// Submitting again after completion replaces that response and rescores.
    pub fn submit(&mut self, position: usize, response: Value) -> Result<QuizState, QuizError> {
        let len = self.pending.len();
        let slot = self
            .pending
            .get_mut(position)
            .ok_or(QuizError::ResponseOutOfRange { position, len })?;
        *slot = Some(response);
        if self.state == QuizState::Unstarted {
            self.state = QuizState::InProgress;
        }

        if self.pending.iter().all(Option::is_some) {
            let responses: Vec<Value> = self.pending.iter().flatten().cloned().collect();
            self.check_responses(&responses)?;
        }
        Ok(self.state)
    }

    /// Forget all responses and outcomes.
    pub fn reset(&mut self) {
        self.items.iter_mut().for_each(Item::reset);
        self.pending.iter_mut().for_each(|r| *r = None);
        self.state = QuizState::Unstarted;
    }
}

impl Quizzable for Quiz {
    fn arity(&self) -> usize {
        self.pending.len()
    }

    fn check_responses(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError> {
        let expected = self.arity();
        if responses.len() != expected {
            return Err(QuizError::ArityMismatch {
                expected,
                actual: responses.len(),
            });
        }

        let mut offset = 0;
        for item in &mut self.items {
            let n = item.arity();
            item.check_responses(&responses[offset..offset + n])?;
            offset += n;
        }

        self.pending = responses.iter().cloned().map(Some).collect();
        self.state = QuizState::Completed;
        let result = self.result();
        tracing::debug!(
            quiz = %self.name,
            score = result.score,
            total = result.total,
            passed = result.passed,
            "checked quiz"
        );
        Ok(result)
    }

    fn score(&self) -> f64 {
        self.items.iter().map(Quizzable::score).sum()
    }

    fn total(&self) -> f64 {
        self.items.iter().map(Quizzable::total).sum()
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Lowercase, dash-separated form of a name, suitable for URLs and file names.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("quiz");
    }
    slug
}
