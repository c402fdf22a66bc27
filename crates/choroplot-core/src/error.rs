pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid map request: {message}")]
    Input { message: String },

    #[error("No usable rows in the uploaded spreadsheet")]
    EmptyDataset,

    #[error("Spreadsheet read error: {message}")]
    Spreadsheet { message: String },

    #[error("Model response rejected: {message}")]
    ModelResponse { message: String },

    #[error("Boundary dataset error ({path}): {message}")]
    Boundary { path: String, message: String },

    #[error("Completion endpoint unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn model_response(message: impl Into<String>) -> Self {
        Self::ModelResponse {
            message: message.into(),
        }
    }
}
