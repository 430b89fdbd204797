use thiserror::Error;

/// Unified error type for folio
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Duplicate project slug: {0}")]
    DuplicateSlug(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type FolioResult<T> = Result<T, FolioError>;
