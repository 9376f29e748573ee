pub mod error;
pub mod repository;
pub mod session;
pub mod storage;

pub use error::{QuizError, QuizResult};
pub use repository::QuizRepository;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quiz {
    pub question: String,
    pub answer: String,
}

impl Quiz {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Checks a submitted answer against the stored one, ignoring case and
    /// surrounding whitespace.
    pub fn is_answered_by(&self, given: &str) -> bool {
        normalize(given) == normalize(&self.answer)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
