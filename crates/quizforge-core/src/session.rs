//! Interactive quiz sessions.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::code::CodeFormat;
use crate::error::QuizError;
use crate::quiz::{Quiz, QuizState};
use crate::quizzable::{CheckResult, Quizzable};
use crate::value::Value;

/// One user's attempt at a quiz.
///
/// A session owns its quiz instance outright; build a new instance per
/// session with [`Quiz::instantiate`].
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    quiz: Quiz,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    code: Option<String>,
}

impl Session {
    pub fn new(quiz: Quiz) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            quiz,
            started_at: Utc::now(),
            finished_at: None,
            code: None,
        };
        tracing::debug!(session = %session.id, quiz = session.quiz.name(), "session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the quiz first completed.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn state(&self) -> QuizState {
        self.quiz.state()
    }

    /// Record the response for the question at `position`.
    pub fn submit(&mut self, position: usize, response: Value) -> Result<QuizState, QuizError> {
        let state = self.quiz.submit(position, response)?;
        self.mark_finished(state);
        Ok(state)
    }

    /// Score all responses at once.
    pub fn submit_all(&mut self, responses: &[Value]) -> Result<CheckResult, QuizError> {
        let result = self.quiz.check_responses(responses)?;
        self.mark_finished(self.quiz.state());
        Ok(result)
    }

    /// The score so far. `None` until the quiz has completed.
    pub fn result(&self) -> Option<CheckResult> {
        match self.quiz.state() {
            QuizState::Completed => Some(self.quiz.result()),
            _ => None,
        }
    }

    /// The completion code for this session, drawn on first request.
    ///
    /// Later calls return the same code while the quiz stays passed. Once a
    /// resubmission drops below the threshold, every call fails with
    /// [`QuizError::NotPassed`].
    pub fn completion_code<R: Rng + ?Sized>(
        &mut self,
        format: &CodeFormat,
        rng: &mut R,
    ) -> Result<&str, QuizError> {
        if !self.quiz.passed() {
            return Err(QuizError::NotPassed);
        }
        if self.code.is_none() {
            let code = format.issue(&self.quiz, rng)?;
            tracing::info!(session = %self.id, quiz = self.quiz.name(), "quiz passed");
            self.code = Some(code);
        }
        Ok(self.code.as_deref().unwrap_or_default())
    }

    fn mark_finished(&mut self, state: QuizState) {
        if state == QuizState::Completed && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiz() -> Quiz {
        Quiz::new(
            "Arithmetic",
            vec![
                Question::new("1+1?", vec![2.into(), 3.into()]).unwrap().into(),
                Question::new("2+2?", vec![4.into(), 5.into()]).unwrap().into(),
            ],
        )
    }

    #[test]
    fn sessions_have_distinct_ids() {
        assert_ne!(Session::new(quiz()).id(), Session::new(quiz()).id());
    }

    #[test]
    fn interactive_flow() {
        let mut session = Session::new(quiz());
        assert_eq!(session.state(), QuizState::Unstarted);
        assert!(session.result().is_none());

        session.submit(0, Value::from(2)).unwrap();
        assert_eq!(session.state(), QuizState::InProgress);
        assert!(session.finished_at().is_none());

        session.submit(1, Value::from(4)).unwrap();
        let result = session.result().unwrap();
        assert!(result.passed);
        assert!(session.finished_at().unwrap() >= session.started_at());
    }

    #[test]
    fn code_only_after_pass_and_cached() {
        let mut rng = StdRng::seed_from_u64(1);
        let format = CodeFormat::pattern("QF-####");
        let mut session = Session::new(quiz());

        assert_eq!(
            session.completion_code(&format, &mut rng).unwrap_err(),
            QuizError::NotPassed
        );

        session.submit_all(&[Value::from(2), Value::from(4)]).unwrap();
        let first = session.completion_code(&format, &mut rng).unwrap().to_string();
        assert!(format.matches(&first));
        let again = session.completion_code(&format, &mut rng).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn failed_attempt_gets_no_code() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(quiz());
        let result = session.submit_all(&[Value::from(2), Value::from(5)]).unwrap();
        assert!(!result.passed);
        assert!(session
            .completion_code(&CodeFormat::default(), &mut rng)
            .is_err());
    }

    #[test]
    fn code_withheld_after_failing_resubmission() {
        let mut rng = StdRng::seed_from_u64(3);
        let format = CodeFormat::default();
        let mut session = Session::new(quiz());

        session.submit_all(&[Value::from(2), Value::from(4)]).unwrap();
        let issued = session.completion_code(&format, &mut rng).unwrap().to_string();

        session.submit(0, Value::from(3)).unwrap();
        assert!(!session.result().unwrap().passed);
        assert_eq!(
            session.completion_code(&format, &mut rng).unwrap_err(),
            QuizError::NotPassed
        );

        session.submit(0, Value::from(2)).unwrap();
        assert_eq!(session.completion_code(&format, &mut rng).unwrap(), issued);
    }
}
