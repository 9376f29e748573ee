use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no quiz with id {0}")]
    NotFound(String),

    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    #[error("input closed before an answer was given")]
    InputClosed,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed quiz file: {0}")]
    Format(#[from] serde_json::Error),
}

pub type QuizResult<T> = Result<T, QuizError>;
