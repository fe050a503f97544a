use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    #[error("Other error: {0}")]
    Other(String),
}
