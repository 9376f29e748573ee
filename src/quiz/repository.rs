use log::debug;

use super::{Quiz, QuizError, QuizResult};

/// Ordered quiz list addressed by position.
///
/// An id is the zero-based index of a quiz in the current ordering, so deleting
/// a quiz shifts every later id down by one.
#[derive(Debug, Clone, Default)]
pub struct QuizRepository {
    quizzes: Vec<Quiz>,
}

impl QuizRepository {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        Self { quizzes }
    }

    pub fn count(&self) -> usize {
        self.quizzes.len()
    }

    /// Appends a quiz and returns its id.
    pub fn add(&mut self, question: &str, answer: &str) -> QuizResult<usize> {
        let quiz = checked_quiz(question, answer)?;
        self.quizzes.push(quiz);
        let id = self.quizzes.len() - 1;
        debug!("Added quiz {}", id);
        Ok(id)
    }

    pub fn get(&self, id: usize) -> QuizResult<&Quiz> {
        self.quizzes
            .get(id)
            .ok_or_else(|| QuizError::NotFound(id.to_string()))
    }

    pub fn all(&self) -> impl Iterator<Item = (usize, &Quiz)> + '_ {
        self.quizzes.iter().enumerate()
    }

    pub fn update(&mut self, id: usize, question: &str, answer: &str) -> QuizResult<()> {
        self.check_id(id)?;
        let quiz = checked_quiz(question, answer)?;
        self.quizzes[id] = quiz;
        debug!("Updated quiz {}", id);
        Ok(())
    }

    /// Removes a quiz; every later quiz moves one id down.
    pub fn delete(&mut self, id: usize) -> QuizResult<Quiz> {
        self.check_id(id)?;
        debug!("Deleted quiz {}", id);
        Ok(self.quizzes.remove(id))
    }

    /// Parses a textual id and checks that it names a live quiz.
    ///
    /// Any integer outside the live range, negative or too large, is `NotFound`;
    /// only non-numeric text is `InvalidArgument`.
    pub fn parse_id(&self, text: &str) -> QuizResult<usize> {
        let text = text.trim();
        let id = match text.parse::<usize>() {
            Ok(id) => id,
            Err(_) if is_integer(text) => return Err(QuizError::NotFound(text.to_string())),
            Err(_) => {
                return Err(QuizError::InvalidArgument(format!(
                    "'{}' is not a valid id",
                    text
                )))
            }
        };
        self.check_id(id)?;
        Ok(id)
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    fn check_id(&self, id: usize) -> QuizResult<()> {
        if id >= self.quizzes.len() {
            return Err(QuizError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn checked_quiz(question: &str, answer: &str) -> QuizResult<Quiz> {
    let question = question.trim();
    let answer = answer.trim();
    if question.is_empty() {
        return Err(QuizError::InvalidArgument("the question is empty".to_string()));
    }
    if answer.is_empty() {
        return Err(QuizError::InvalidArgument("the answer is empty".to_string()));
    }
    Ok(Quiz::new(question, answer))
}
