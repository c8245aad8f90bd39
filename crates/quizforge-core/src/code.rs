//! Completion codes handed out once a quiz is passed.
//!
//! Pattern templates use `#` for a digit, `?` for an uppercase letter, `*`
//! for an uppercase letter or digit, and `\` to take the next character
//! literally. Everything else is copied as-is.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::quizzable::Quizzable;

/// Uppercase letters and digits without the easily confused `I`, `O`, `0`, `1`.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const DEFAULT_LENGTH: usize = 8;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How completion codes are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CodeFormat {
    /// `length` characters drawn uniformly from `alphabet`.
    Random {
        #[serde(default = "default_length")]
        length: usize,
        #[serde(default = "default_alphabet")]
        alphabet: String,
    },
    /// A template with random slots.
    Pattern { pattern: String },
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

impl Default for CodeFormat {
    fn default() -> Self {
        CodeFormat::Random {
            length: DEFAULT_LENGTH,
            alphabet: default_alphabet(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Random(&'static [u8]),
    Literal(char),
}

impl Slot {
    fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> char {
        match self {
            Slot::Random(pool) => pool[rng.gen_range(0..pool.len())] as char,
            Slot::Literal(c) => c,
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Slot::Random(pool) => c.is_ascii() && pool.contains(&(c as u8)),
            Slot::Literal(l) => l == c,
        }
    }
}

fn parse_template(template: &str) -> Result<Vec<Slot>, QuizError> {
    let mut slots = Vec::new();
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        slots.push(match c {
            '#' => Slot::Random(DIGITS),
            '?' => Slot::Random(LETTERS),
            '*' => Slot::Random(ALPHANUMERIC),
            '\\' => match chars.next() {
                Some(escaped) => Slot::Literal(escaped),
                None => {
                    return Err(QuizError::InvalidCodeFormat(format!(
                        "template '{template}' ends with a dangling escape"
                    )))
                }
            },
            other => Slot::Literal(other),
        });
    }
    if !slots.iter().any(|s| matches!(s, Slot::Random(_))) {
        return Err(QuizError::InvalidCodeFormat(format!(
            "template '{template}' has no random slots"
        )));
    }
    Ok(slots)
}

impl CodeFormat {
    pub fn random(length: usize, alphabet: impl Into<String>) -> Self {
        CodeFormat::Random {
            length,
            alphabet: alphabet.into(),
        }
    }

    pub fn pattern(template: impl Into<String>) -> Self {
        CodeFormat::Pattern {
            pattern: template.into(),
        }
    }

    /// Check that this format can produce codes.
    pub fn validate(&self) -> Result<(), QuizError> {
        match self {
            CodeFormat::Random { length, alphabet } => {
                if *length == 0 {
                    return Err(QuizError::InvalidCodeFormat("length must be at least 1".into()));
                }
                if alphabet.is_empty() {
                    return Err(QuizError::InvalidCodeFormat("alphabet is empty".into()));
                }
                Ok(())
            }
            CodeFormat::Pattern { pattern } => parse_template(pattern).map(|_| ()),
        }
    }

    /// Draw a code. Does not look at any quiz; see [`CodeFormat::issue`].
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, QuizError> {
        self.validate()?;
        match self {
            CodeFormat::Random { length, alphabet } => {
                let alphabet: Vec<char> = alphabet.chars().collect();
                Ok((0..*length)
                    .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                    .collect())
            }
            CodeFormat::Pattern { pattern } => Ok(parse_template(pattern)?
                .into_iter()
                .map(|slot| slot.draw(rng))
                .collect()),
        }
    }

    /// Whether `code` could have been produced by this format.
    pub fn matches(&self, code: &str) -> bool {
        match self {
            CodeFormat::Random { length, alphabet } => {
                code.chars().count() == *length && code.chars().all(|c| alphabet.contains(c))
            }
            CodeFormat::Pattern { pattern } => match parse_template(pattern) {
                Ok(slots) => {
                    code.chars().count() == slots.len()
                        && slots.iter().zip(code.chars()).all(|(s, c)| s.accepts(c))
                }
                Err(_) => false,
            },
        }
    }

    /// Draw a code for a passed quizzable.
    pub fn issue<Q, R>(&self, quizzable: &Q, rng: &mut R) -> Result<String, QuizError>
    where
        Q: Quizzable + ?Sized,
        R: Rng + ?Sized,
    {
        if !quizzable.passed() {
            return Err(QuizError::NotPassed);
        }
        let code = self.generate(rng)?;
        tracing::info!("issued completion code");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_codes_use_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        let format = CodeFormat::random(12, "AB");
        for _ in 0..20 {
            let code = format.generate(&mut rng).unwrap();
            assert_eq!(code.len(), 12);
            assert!(code.chars().all(|c| c == 'A' || c == 'B'));
            assert!(format.matches(&code));
        }
    }

    #[test]
    fn default_format() {
        let mut rng = StdRng::seed_from_u64(2);
        let code = CodeFormat::default().generate(&mut rng).unwrap();
        assert_eq!(code.len(), DEFAULT_LENGTH);
        assert!(CodeFormat::default().matches(&code));
        assert!(!CodeFormat::default().matches("0000OOOO"));
    }

    #[test]
    fn pattern_fills_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        let format = CodeFormat::pattern("QF-####-??*");
        let code = format.generate(&mut rng).unwrap();
        assert_eq!(code.len(), 11);
        assert!(code.starts_with("QF-"));
        assert!(code[3..7].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&code[7..8], "-");
        assert!(code[8..10].chars().all(|c| c.is_ascii_uppercase()));
        assert!(format.matches(&code));
        assert!(!format.matches("QF-12A4-AB1"));
        assert!(!format.matches("QF-1234-AB"));
    }

    #[test]
    fn escaped_placeholders_are_literal() {
        let mut rng = StdRng::seed_from_u64(4);
        let code = CodeFormat::pattern(r"\#\?#").generate(&mut rng).unwrap();
        assert!(code.starts_with("#?"));
        assert!(code.chars().nth(2).unwrap().is_ascii_digit());
    }

    #[test]
    fn invalid_formats() {
        assert!(CodeFormat::random(0, "AB").validate().is_err());
        assert!(CodeFormat::random(4, "").validate().is_err());
        assert!(CodeFormat::pattern("FIXED").validate().is_err());
        assert!(CodeFormat::pattern("AB#\\").validate().is_err());
        assert!(CodeFormat::pattern("AB#").validate().is_ok());
    }

    #[test]
    fn issue_requires_pass() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut q = Question::new("1+1?", vec![2.into(), 3.into()]).unwrap();
        let format = CodeFormat::default();
        assert_eq!(format.issue(&q, &mut rng), Err(QuizError::NotPassed));
        q.check(3).unwrap();
        assert_eq!(format.issue(&q, &mut rng), Err(QuizError::NotPassed));
        q.check(2).unwrap();
        assert!(format.issue(&q, &mut rng).is_ok());
    }

    #[test]
    fn toml_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            completion: CodeFormat,
        }
        let w: Wrapper = toml::from_str("[completion]\nmode = \"random\"\nlength = 6\n").unwrap();
        assert_eq!(w.completion, CodeFormat::random(6, DEFAULT_ALPHABET));
        let w: Wrapper =
            toml::from_str("[completion]\nmode = \"pattern\"\npattern = \"QF-####\"\n").unwrap();
        assert_eq!(w.completion, CodeFormat::pattern("QF-####"));
    }
}
