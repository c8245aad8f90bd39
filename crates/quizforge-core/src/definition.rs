//! Quiz definitions and the loaders that read them from disk.
//!
//! A definition is what an author writes. [`Quiz::instantiate`] turns it into
//! a fresh quiz instance; every session should get its own instance.
//!
//! Two kinds of source files are understood: markdown (see
//! [`crate::markdown`]) and declarative TOML:
//!
//! ```toml
//! [quiz]
//! name = "Version control"
//! url = "/vcs"
//! threshold = 0.8
//!
//! [[terms]]
//! name = "Git"
//! definition = "Distributed version control system"
//!
//! [[questions]]
//! prompt = "2+2?"
//! choices = [4, 3, 5]
//!
//! [[generate]]
//! kind = "multiple_choice"
//! count = 1
//! repeat = 5
//! choices = 4
//! side = "definition"
//!
//! [completion]
//! mode = "pattern"
//! pattern = "VCS-####"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::RngCore;
use serde::Deserialize;

use crate::code::CodeFormat;
use crate::error::QuizError;
use crate::markdown::parse_document;
use crate::question::Question;
use crate::quiz::{slugify, Item, Quiz};
use crate::quizzable::{Quizzable, DEFAULT_THRESHOLD};
use crate::value::Value;
use crate::vocabulary::{MultipleChoiceOptions, Term, TermSide, Vocabulary};

/// An author-supplied quiz.
///
/// `questions` is called once per instance and may sample from the
/// vocabulary, so repeated instances of the same definition can differ.
pub trait QuizDefinition: Send + Sync {
    fn name(&self) -> &str;

    /// Route for the quiz in an interactive app.
    fn url(&self) -> String {
        format!("/{}", slugify(self.name()))
    }

    fn threshold(&self) -> f64 {
        DEFAULT_THRESHOLD
    }

    /// Vocabulary terms available to `questions`.
    fn terms(&self) -> Vec<Term> {
        Vec::new()
    }

    fn questions(
        &self,
        vocabulary: &Vocabulary,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Item>, QuizError>;

    /// Completion code format for this quiz, if it overrides the default.
    fn completion(&self) -> Option<&CodeFormat> {
        None
    }
}

// ---------------------------------------------------------------------------
// Markdown definitions
// ---------------------------------------------------------------------------

/// A quiz written in the markdown grammar. Its questions never change.
#[derive(Debug, Clone)]
pub struct MarkdownQuiz {
    name: String,
    url: String,
    questions: Vec<Question>,
}

impl MarkdownQuiz {
    /// Parse markdown source. A `# heading` before the first question wins
    /// over `fallback_name`.
    pub fn parse(fallback_name: &str, source: &str) -> Result<Self, QuizError> {
        let doc = parse_document(source)?;
        let name = doc.title.unwrap_or_else(|| fallback_name.to_string());
        Ok(Self {
            url: format!("/{}", slugify(&name)),
            name,
            questions: doc.questions,
        })
    }

    /// Load a markdown quiz. The route comes from the file stem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
        let stem = file_stem(path);
        let mut quiz = Self::parse(&stem, &content)
            .with_context(|| format!("failed to parse quiz: {}", path.display()))?;
        quiz.url = format!("/{}", slugify(&stem));
        Ok(quiz)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl QuizDefinition for MarkdownQuiz {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn questions(&self, _: &Vocabulary, _: &mut dyn RngCore) -> Result<Vec<Item>, QuizError> {
        Ok(self.questions.iter().map(|q| Item::Question(q.fresh())).collect())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quiz".to_string())
}

// ---------------------------------------------------------------------------
// TOML definitions
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    terms: Vec<Term>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    generate: Vec<TomlGenerator>,
    #[serde(default)]
    completion: Option<CodeFormat>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    prompt: String,
    choices: Vec<Value>,
    #[serde(default = "default_points")]
    points: f64,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TomlGenerator {
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default = "default_one")]
    count: usize,
    #[serde(default = "default_one")]
    repeat: usize,
    #[serde(default = "default_choices")]
    choices: usize,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    term: Option<String>,
}

fn default_kind() -> String {
    "multiple_choice".to_string()
}

fn default_one() -> usize {
    1
}

fn default_choices() -> usize {
    MultipleChoiceOptions::default().choices_per_question
}

/// A fixed question in a TOML quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSpec {
    pub prompt: String,
    pub choices: Vec<Value>,
    pub points: f64,
}

/// A vocabulary generator in a TOML quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorSpec {
    /// `count` questions; about `term` every time when set.
    MultipleChoice {
        count: usize,
        options: MultipleChoiceOptions,
        term: Option<String>,
    },
    /// `groups` matching exercises of `size` terms each.
    Matching {
        groups: usize,
        size: usize,
        side: TermSide,
    },
}

/// A declarative quiz, usually loaded from TOML.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSpec {
    pub name: String,
    pub url: Option<String>,
    pub threshold: f64,
    pub terms: Vec<Term>,
    pub questions: Vec<QuestionSpec>,
    pub generators: Vec<GeneratorSpec>,
    pub completion: Option<CodeFormat>,
}

impl QuizDefinition for QuizSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("/{}", slugify(&self.name)),
        }
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn terms(&self) -> Vec<Term> {
        self.terms.clone()
    }

    fn questions(
        &self,
        vocabulary: &Vocabulary,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Item>, QuizError> {
        let mut items = Vec::new();
        for q in &self.questions {
            let question = Question::new(q.prompt.clone(), q.choices.clone())?.with_points(q.points)?;
            items.push(Item::Question(question));
        }

        for generator in &self.generators {
            match generator {
                GeneratorSpec::MultipleChoice {
                    count,
                    options,
                    term: Some(name),
                } => {
                    for _ in 0..*count {
                        items.push(vocabulary.multiple_choice_for(rng, name, *options)?.into());
                    }
                }
                GeneratorSpec::MultipleChoice {
                    count,
                    options,
                    term: None,
                } => items.extend(
                    vocabulary
                        .multiple_choice(rng, *count, *options)?
                        .into_iter()
                        .map(Item::from),
                ),
                GeneratorSpec::Matching { groups, size, side } => {
                    for _ in 0..*groups {
                        items.extend(
                            vocabulary
                                .matching(rng, *size, *side)?
                                .into_iter()
                                .map(Item::from),
                        );
                    }
                }
            }
        }
        Ok(items)
    }

    fn completion(&self) -> Option<&CodeFormat> {
        self.completion.as_ref()
    }
}

/// Parse a TOML quiz file.
pub fn parse_quiz_spec(path: &Path) -> Result<QuizSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_spec_str(&content, path)
}

/// Parse a TOML string into a `QuizSpec` (useful for testing).
pub fn parse_quiz_spec_str(content: &str, source_path: &Path) -> Result<QuizSpec> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let generators = parsed
        .generate
        .into_iter()
        .map(|g| -> Result<GeneratorSpec> {
            let side = g
                .side
                .as_deref()
                .map(|s| s.parse::<TermSide>().map_err(|e| anyhow::anyhow!("{}", e)))
                .transpose()?
                .unwrap_or_default();
            let count = g.count * g.repeat;
            match g.kind.as_str() {
                "multiple_choice" | "multiple-choice" => Ok(GeneratorSpec::MultipleChoice {
                    count,
                    options: MultipleChoiceOptions {
                        choices_per_question: g.choices,
                        side,
                    },
                    term: g.term,
                }),
                "matching" => Ok(GeneratorSpec::Matching {
                    groups: count,
                    size: g.choices,
                    side,
                }),
                other => anyhow::bail!("unknown generator kind: {other}"),
            }
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid generator in {}", source_path.display()))?;

    if let Some(format) = &parsed.completion {
        format
            .validate()
            .with_context(|| format!("invalid completion code in {}", source_path.display()))?;
    }

    Ok(QuizSpec {
        name: parsed.quiz.name,
        url: parsed.quiz.url,
        threshold: parsed.quiz.threshold,
        terms: parsed.terms,
        questions: parsed
            .questions
            .into_iter()
            .map(|q| QuestionSpec {
                prompt: q.prompt,
                choices: q.choices,
                points: q.points,
            })
            .collect(),
        generators,
        completion: parsed.completion,
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A definition together with the file it came from.
pub struct QuizSource {
    pub path: PathBuf,
    pub definition: Box<dyn QuizDefinition>,
}

/// Load a `.md` or `.toml` quiz file.
pub fn load_definition(path: &Path) -> Result<Box<dyn QuizDefinition>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") | Some("markdown") => Ok(Box::new(MarkdownQuiz::from_path(path)?)),
        Some("toml") => Ok(Box::new(parse_quiz_spec(path)?)),
        _ => anyhow::bail!(
            "unsupported quiz source (expected .md or .toml): {}",
            path.display()
        ),
    }
}

/// Load a single quiz file, or every quiz file under a directory.
pub fn load_sources(path: &Path) -> Result<Vec<QuizSource>> {
    if path.is_dir() {
        load_definitions_dir(path)
    } else {
        Ok(vec![QuizSource {
            path: path.to_path_buf(),
            definition: load_definition(path)?,
        }])
    }
}

/// Recursively load all quiz files in a directory, in path order.
///
/// Fails on the first source that does not load.
pub fn load_definitions_dir(dir: &Path) -> Result<Vec<QuizSource>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            sources.extend(load_definitions_dir(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "md" || ext == "markdown" || ext == "toml")
        {
            let definition = load_definition(&path)?;
            tracing::debug!("loaded {} from {}", definition.name(), path.display());
            sources.push(QuizSource { path, definition });
        }
    }

    Ok(sources)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Position of the question in response order (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Look for authoring mistakes that still produce a usable quiz.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let leaves = quiz.leaves();

    if leaves.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "quiz has no questions and can never be passed".into(),
        });
    }

    // Check for repeated prompts among authored questions
    let mut seen = HashSet::new();
    let mut position = 0;
    for item in quiz.items() {
        if let Item::Question(q) = item {
            if !seen.insert(q.prompt()) {
                warnings.push(ValidationWarning {
                    question: Some(position),
                    message: format!("duplicate prompt: {}", q.prompt()),
                });
            }
        }
        position += item.arity();
    }

    // Check for repeated choices; a repeated answer makes a distractor correct
    for (i, q) in leaves.iter().enumerate() {
        let choices = q.choices();
        let repeated = choices
            .iter()
            .enumerate()
            .find(|(j, c)| choices[..*j].contains(c));
        if let Some((_, choice)) = repeated {
            let message = if choice == q.answer() && !q.has_custom_checker() {
                format!("answer '{choice}' also appears as a distractor")
            } else {
                format!("choice '{choice}' appears more than once")
            };
            warnings.push(ValidationWarning {
                question: Some(i),
                message,
            });
        }
    }

    warnings
}
