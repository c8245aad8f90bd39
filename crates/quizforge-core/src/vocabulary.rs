//! Vocabulary terms and the question generators built on them.
//!
//! Every generator call samples afresh from the caller's RNG. Distractors are
//! distinct within one question and drawn from the terms other than the
//! subject; questions in the same batch are sampled independently, so a term
//! may be the subject (or a distractor) of several questions.

use std::fmt;
use std::str::FromStr;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::question::Question;
use crate::quizzable::{CheckResult, Quizzable};
use crate::value::Value;

/// A name and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub definition: String,
}

impl Term {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.definition)
    }
}

/// Which side of a term is shown as the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSide {
    /// Show the name, choose among definitions.
    Name,
    /// Show the definition, choose among names.
    #[default]
    Definition,
    /// Pick one of the above per question.
    Random,
}

impl TermSide {
    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> TermSide {
        match self {
            TermSide::Random => {
                if rng.gen_bool(0.5) {
                    TermSide::Name
                } else {
                    TermSide::Definition
                }
            }
            side => side,
        }
    }

    /// (prompt, answer) for a resolved side.
    fn split(self, term: &Term) -> (&str, &str) {
        match self {
            TermSide::Name => (&term.name, &term.definition),
            _ => (&term.definition, &term.name),
        }
    }
}

impl fmt::Display for TermSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermSide::Name => write!(f, "name"),
            TermSide::Definition => write!(f, "definition"),
            TermSide::Random => write!(f, "random"),
        }
    }
}

impl FromStr for TermSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "term" => Ok(TermSide::Name),
            "definition" => Ok(TermSide::Definition),
            "random" => Ok(TermSide::Random),
            other => Err(format!("unknown term side: {other}")),
        }
    }
}

/// Settings for multiple-choice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceOptions {
    /// Choices per question, the answer included.
    pub choices_per_question: usize,
    pub side: TermSide,
}

impl Default for MultipleChoiceOptions {
    fn default() -> Self {
        Self {
            choices_per_question: 5,
            side: TermSide::Definition,
        }
    }
}

/// How a vocabulary question was produced, kept so it can be resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    MultipleChoice(MultipleChoiceOptions),
    Matching { size: usize, side: TermSide },
}

/// An ordered set of terms with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<Term>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary, failing on the first duplicate name.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Result<Self, QuizError> {
        let mut vocab = Self::new();
        for term in terms {
            vocab.push(term)?;
        }
        Ok(vocab)
    }

    pub fn add_term(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<(), QuizError> {
        self.push(Term::new(name, definition))
    }

    fn push(&mut self, term: Term) -> Result<(), QuizError> {
        if self.get(&term.name).is_some() {
            return Err(QuizError::DuplicateTerm(term.name));
        }
        self.terms.push(term);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Generate `count` multiple-choice questions with random subjects.
    pub fn multiple_choice<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        options: MultipleChoiceOptions,
    ) -> Result<Vec<VocabularyQuestion>, QuizError> {
        self.ensure_terms(options.choices_per_question)?;
        let questions = (0..count)
            .map(|_| {
                let subject = rng.gen_range(0..self.terms.len());
                self.build_multiple_choice(rng, subject, options)
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            count,
            choices = options.choices_per_question,
            side = %options.side,
            "generated multiple choice questions"
        );
        Ok(questions)
    }

    /// Generate one multiple-choice question about the named term.
    pub fn multiple_choice_for<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        name: &str,
        options: MultipleChoiceOptions,
    ) -> Result<VocabularyQuestion, QuizError> {
        self.ensure_terms(options.choices_per_question)?;
        let subject = self
            .terms
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| QuizError::invalid_question(name, "term is not in the vocabulary"))?;
        self.build_multiple_choice(rng, subject, options)
    }

    /// Generate a matching exercise over `size` sampled terms.
    ///
    /// Each returned question asks about one term of the group and offers the
    /// counterparts of the whole group as choices, its own answer first.
    pub fn matching<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        size: usize,
        side: TermSide,
    ) -> Result<Vec<VocabularyQuestion>, QuizError> {
        self.ensure_terms(size)?;
        let side_shown = side.resolve(rng);
        let group: Vec<&Term> = index::sample(rng, self.terms.len(), size)
            .into_iter()
            .map(|i| &self.terms[i])
            .collect();

        group
            .iter()
            .enumerate()
            .map(|(i, subject)| -> Result<VocabularyQuestion, QuizError> {
                let (prompt, answer) = side_shown.split(subject);
                let mut choices = vec![Value::from(answer)];
                choices.extend(
                    group
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, other)| Value::from(side_shown.split(other).1)),
                );
                Ok(VocabularyQuestion {
                    question: Question::new(prompt, choices)?,
                    subject: (*subject).clone(),
                    generator: Generator::Matching { size, side },
                })
            })
            .collect()
    }

    fn ensure_terms(&self, needed: usize) -> Result<(), QuizError> {
        if needed < 2 {
            return Err(QuizError::invalid_question(
                "<generated>",
                format!("a generated question needs at least 2 choices, got {needed}"),
            ));
        }
        if self.terms.len() < needed {
            return Err(QuizError::InsufficientTerms {
                needed,
                available: self.terms.len(),
            });
        }
        Ok(())
    }

    fn build_multiple_choice<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        subject: usize,
        options: MultipleChoiceOptions,
    ) -> Result<VocabularyQuestion, QuizError> {
        let side = options.side.resolve(rng);
        let term = &self.terms[subject];
        let (prompt, answer) = side.split(term);

        // Sample among the other terms, skipping over the subject's slot.
        let others = self.terms.len() - 1;
        let mut choices = vec![Value::from(answer)];
        choices.extend(
            index::sample(rng, others, options.choices_per_question - 1)
                .into_iter()
                .map(|i| if i >= subject { i + 1 } else { i })
                .map(|i| Value::from(side.split(&self.terms[i]).1)),
        );

        Ok(VocabularyQuestion {
            question: Question::new(prompt, choices)?,
            subject: term.clone(),
            generator: Generator::MultipleChoice(options),
        })
    }
}

/// A question generated from a vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyQuestion {
    question: Question,
    subject: Term,
    generator: Generator,
}

impl VocabularyQuestion {
    pub fn question(&self) -> &Question {
        &self.question
    }

    pub(crate) fn question_mut(&mut self) -> &mut Question {
        &mut self.question
    }

    /// The term this question asks about.
    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Sample a new question with the same settings.
    pub fn regenerate<R: Rng + ?Sized>(
        &self,
        vocab: &Vocabulary,
        rng: &mut R,
    ) -> Result<VocabularyQuestion, QuizError> {
        match self.generator {
            Generator::MultipleChoice(options) => {
                vocab.ensure_terms(options.choices_per_question)?;
                let subject = rng.gen_range(0..vocab.len());
                vocab.build_multiple_choice(rng, subject, options)
            }
            Generator::Matching { size, side } => {
                let mut group = vocab.matching(rng, size, side)?;
                let pick = rng.gen_range(0..group.len());
                Ok(group.swap_remove(pick))
            }
        }
    }

    /// `n` independently sampled questions with the same settings.
    pub fn repeat<R: Rng + ?Sized>(
        &self,
        vocab: &Vocabulary,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<VocabularyQuestion>, QuizError> {
        (0..n).map(|_| self.regenerate(vocab, rng)).collect()
    }
}

impl Quizzable for VocabularyQuestion {
    fn arity(&self) -> usize {
        1
    }

    fn check_responses(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError> {
        self.question.check_responses(responses)
    }

    fn score(&self) -> f64 {
        self.question.score()
    }

    fn total(&self) -> f64 {
        self.question.total()
    }

    fn threshold(&self) -> f64 {
        self.question.threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn vcs(n: usize) -> Vocabulary {
        let all = [
            ("Git", "distributed version control"),
            ("Mercurial", "hg"),
            ("Github", "hosted git with pull requests"),
            ("Gitlab", "self-hostable forge"),
            ("Bitbucket", "Atlassian forge"),
            ("Gitorious", "retired forge"),
        ];
        Vocabulary::from_terms(all.iter().take(n).map(|(n, d)| Term::new(*n, *d))).unwrap()
    }

    fn opts(choices: usize, side: TermSide) -> MultipleChoiceOptions {
        MultipleChoiceOptions {
            choices_per_question: choices,
            side,
        }
    }

    #[test]
    fn duplicate_terms_fail_fast() {
        let err = Vocabulary::from_terms(vec![Term::new("Git", "a"), Term::new("Git", "b")])
            .unwrap_err();
        assert_eq!(err, QuizError::DuplicateTerm("Git".into()));

        let mut vocab = vcs(2);
        assert!(vocab.add_term("Git", "again").is_err());
        vocab.add_term("Fossil", "sqlite's vcs").unwrap();
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn multiple_choice_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let vocab = vcs(6);
        let qs = vocab
            .multiple_choice(&mut rng, 20, opts(4, TermSide::Definition))
            .unwrap();
        assert_eq!(qs.len(), 20);
        for q in &qs {
            let choices = q.question().choices();
            assert_eq!(choices.len(), 4);
            let distinct: HashSet<String> = choices.iter().map(|c| c.to_string()).collect();
            assert_eq!(distinct.len(), 4, "distractors must be distinct");
            assert_eq!(q.question().prompt(), q.subject().definition);
            assert_eq!(q.question().answer(), &Value::from(q.subject().name.as_str()));
        }
    }

    #[test]
    fn name_side_asks_for_definitions() {
        let mut rng = StdRng::seed_from_u64(2);
        let vocab = vcs(5);
        let qs = vocab.multiple_choice(&mut rng, 5, opts(3, TermSide::Name)).unwrap();
        for q in &qs {
            assert_eq!(q.question().prompt(), q.subject().name);
            assert_eq!(
                q.question().answer(),
                &Value::from(q.subject().definition.as_str())
            );
        }
    }

    #[test]
    fn random_side_uses_both() {
        let mut rng = StdRng::seed_from_u64(3);
        let vocab = vcs(5);
        let qs = vocab
            .multiple_choice(&mut rng, 64, opts(2, TermSide::Random))
            .unwrap();
        let by_name = qs
            .iter()
            .filter(|q| q.question().prompt() == q.subject().name)
            .count();
        assert!(by_name > 0 && by_name < qs.len());
    }

    #[test]
    fn exactly_enough_terms_succeeds() {
        let mut rng = StdRng::seed_from_u64(4);
        let vocab = vcs(5);
        let qs = vocab
            .multiple_choice(&mut rng, 1, MultipleChoiceOptions::default())
            .unwrap();
        assert_eq!(qs[0].question().choices().len(), 5);
    }

    #[test]
    fn too_few_terms_is_insufficient() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = vcs(4)
            .multiple_choice(&mut rng, 1, MultipleChoiceOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            QuizError::InsufficientTerms {
                needed: 5,
                available: 4
            }
        );
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(6);
        let qs = vcs(5)
            .multiple_choice(&mut rng, 0, MultipleChoiceOptions::default())
            .unwrap();
        assert!(qs.is_empty());
    }

    #[test]
    fn targeted_subject() {
        let mut rng = StdRng::seed_from_u64(7);
        let vocab = vcs(6);
        let q = vocab
            .multiple_choice_for(&mut rng, "Mercurial", opts(3, TermSide::Definition))
            .unwrap();
        assert_eq!(q.subject().name, "Mercurial");
        assert_eq!(q.question().prompt(), "hg");
        assert!(vocab
            .multiple_choice_for(&mut rng, "CVS", opts(3, TermSide::Definition))
            .is_err());
    }

    #[test]
    fn generated_question_checks_against_subject() {
        let mut rng = StdRng::seed_from_u64(8);
        let vocab = vcs(6);
        let mut qs = vocab
            .multiple_choice(&mut rng, 2, MultipleChoiceOptions::default())
            .unwrap();
        let answer = Value::from(qs[0].subject().name.as_str());
        assert!(qs[0].check(answer).unwrap().passed);
        assert!(!qs[1].check("not a vcs").unwrap().passed);
    }

    #[test]
    fn repeat_keeps_settings() {
        let mut rng = StdRng::seed_from_u64(9);
        let vocab = vcs(6);
        let seed = vocab
            .multiple_choice(&mut rng, 1, opts(3, TermSide::Name))
            .unwrap()
            .remove(0);
        let batch = seed.repeat(&vocab, &mut rng, 5).unwrap();
        assert_eq!(batch.len(), 5);
        for q in &batch {
            assert_eq!(q.generator(), seed.generator());
            assert_eq!(q.question().choices().len(), 3);
            assert_eq!(q.question().prompt(), q.subject().name);
        }
    }

    #[test]
    fn matching_shares_one_pool() {
        let mut rng = StdRng::seed_from_u64(10);
        let vocab = vcs(6);
        let group = vocab.matching(&mut rng, 3, TermSide::Name).unwrap();
        assert_eq!(group.len(), 3);
        let pool = |q: &VocabularyQuestion| {
            let mut v: Vec<String> = q.question().choices().iter().map(|c| c.to_string()).collect();
            v.sort();
            v
        };
        assert_eq!(pool(&group[0]), pool(&group[1]));
        assert_eq!(pool(&group[1]), pool(&group[2]));
        let subjects: HashSet<&str> = group.iter().map(|q| q.subject().name.as_str()).collect();
        assert_eq!(subjects.len(), 3);
    }

    #[test]
    fn matching_needs_enough_terms() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(matches!(
            vcs(2).matching(&mut rng, 3, TermSide::Name),
            Err(QuizError::InsufficientTerms { .. })
        ));
        assert!(vcs(6).matching(&mut rng, 1, TermSide::Name).is_err());
    }

    #[test]
    fn term_side_parse() {
        assert_eq!("Name".parse::<TermSide>().unwrap(), TermSide::Name);
        assert_eq!("term".parse::<TermSide>().unwrap(), TermSide::Name);
        assert_eq!("random".parse::<TermSide>().unwrap(), TermSide::Random);
        assert!("both".parse::<TermSide>().is_err());
    }
}
