use thiserror::Error;

pub type Result<T> = std::result::Result<T, SentryError>;

#[derive(Error, Debug)]
pub enum SentryError {
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Model loading error: {0}")]
    ModelLoad(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Push payload error: {0}")]
    Push(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
