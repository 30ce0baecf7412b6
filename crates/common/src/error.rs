//! Error types shared across Spotcut crates.

/// Top-level error type for Spotcut operations.
#[derive(Debug, thiserror::Error)]
pub enum SpotcutError {
    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Fetch error: {message}")]
    Fetch { message: String },

    #[error("Speech synthesis error: {message}")]
    Speech { message: String },

    #[error("Clip lookup error: {message}")]
    Locate { message: String },

    #[error("Mux error: {message}")]
    Mux { message: String },

    #[error("Normalize error: {message}")]
    Normalize { message: String },

    #[error("Concat error: {message}")]
    Concat { message: String },

    #[error("Assembly error: {message}")]
    Assembly { message: String },

    #[error("Script error: {message}")]
    Script { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SpotcutError.
pub type SpotcutResult<T> = Result<T, SpotcutError>;

impl SpotcutError {
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch {
            message: msg.into(),
        }
    }

    pub fn speech(msg: impl Into<String>) -> Self {
        Self::Speech {
            message: msg.into(),
        }
    }

    pub fn locate(msg: impl Into<String>) -> Self {
        Self::Locate {
            message: msg.into(),
        }
    }

    pub fn mux(msg: impl Into<String>) -> Self {
        Self::Mux {
            message: msg.into(),
        }
    }

    pub fn normalize(msg: impl Into<String>) -> Self {
        Self::Normalize {
            message: msg.into(),
        }
    }

    pub fn concat(msg: impl Into<String>) -> Self {
        Self::Concat {
            message: msg.into(),
        }
    }

    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly {
            message: msg.into(),
        }
    }

    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
