use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A dump/restore/drop container exited non-zero or never started.
    #[error("{label} failed: {detail}")]
    ExternalTool { label: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn external(label: &str, detail: impl Into<String>) -> Self {
        AppError::ExternalTool {
            label: label.to_string(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
