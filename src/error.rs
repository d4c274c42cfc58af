use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("File error: {0}")]
    IoError(String),

    #[error("Can't analyze {0}: no games found for this hero")]
    CannotAnalyze(String),
}
