//! The scoring contract shared by questions, generated questions and quizzes.
//!
//! A leaf (a single question) expects exactly one response. A composite (a
//! quiz) expects one response per leaf it contains, in the order returned by
//! [`crate::quiz::Quiz::leaves`]. Both are scored the same way, so a whole
//! quiz can be nested inside another one without special cases.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::value::Value;

/// Default passing threshold: every point must be earned.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Outcome of checking a quizzable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Points earned.
    pub score: f64,
    /// Points available.
    pub total: f64,
    /// Whether `score / total` reached the threshold.
    pub passed: bool,
}

impl CheckResult {
    /// Fraction of the total that was earned, 0.0 for an empty total.
    pub fn ratio(&self) -> f64 {
        if self.total > 0.0 {
            self.score / self.total
        } else {
            0.0
        }
    }
}

/// One response or an ordered sequence of responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Responses {
    Single(Value),
    Sequence(Vec<Value>),
}

impl Responses {
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Responses::Single(v) => std::slice::from_ref(v),
            Responses::Sequence(vs) => vs,
        }
    }
}

impl From<Value> for Responses {
    fn from(v: Value) -> Self {
        Responses::Single(v)
    }
}

impl From<Vec<Value>> for Responses {
    fn from(vs: Vec<Value>) -> Self {
        Responses::Sequence(vs)
    }
}

impl From<i64> for Responses {
    fn from(i: i64) -> Self {
        Responses::Single(Value::Integer(i))
    }
}

impl From<i32> for Responses {
    fn from(i: i32) -> Self {
        Responses::Single(Value::from(i))
    }
}

impl From<f64> for Responses {
    fn from(n: f64) -> Self {
        Responses::Single(Value::Number(n))
    }
}

impl From<&str> for Responses {
    fn from(s: &str) -> Self {
        Responses::Single(Value::from(s))
    }
}

/// `score / total >= threshold`, never passing an empty total.
pub fn meets_threshold(score: f64, total: f64, threshold: f64) -> bool {
    total > 0.0 && score / total >= threshold
}

/// Anything that can be answered and scored.
pub trait Quizzable {
    /// Number of responses `check_responses` expects.
    fn arity(&self) -> usize;

    /// Score the given responses and remember the outcome.
    fn check_responses(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError>;

    /// Points earned by the last check, 0 before any check.
    fn score(&self) -> f64;

    /// Points available. Known from structure alone.
    fn total(&self) -> f64;

    /// Fraction of `total` required to pass.
    fn threshold(&self) -> f64 {
        DEFAULT_THRESHOLD
    }

    fn passed(&self) -> bool {
        meets_threshold(self.score(), self.total(), self.threshold())
    }

    fn result(&self) -> CheckResult {
        CheckResult {
            score: self.score(),
            total: self.total(),
            passed: self.passed(),
        }
    }

    /// Check a single response or a sequence of responses.
    fn check<R>(&mut self, responses: R) -> Result<CheckResult, QuizError>
    where
        R: Into<Responses>,
        Self: Sized,
    {
        let responses = responses.into();
        self.check_responses(responses.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(meets_threshold(1.0, 1.0, 1.0));
        assert!(meets_threshold(9.0, 10.0, 0.9));
        assert!(!meets_threshold(8.0, 10.0, 0.9));
    }

    #[test]
    fn empty_total_never_passes() {
        assert!(!meets_threshold(0.0, 0.0, 1.0));
    }

    #[test]
    fn single_response_is_a_one_element_slice() {
        let r = Responses::from(4);
        assert_eq!(r.as_slice(), &[Value::Integer(4)]);
        let r = Responses::from(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(r.as_slice().len(), 2);
    }

    #[test]
    fn ratio_handles_zero_total() {
        let r = CheckResult {
            score: 0.0,
            total: 0.0,
            passed: false,
        };
        assert_eq!(r.ratio(), 0.0);
    }
}
