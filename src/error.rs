use thiserror::Error;

/// Fallback shown when the analysis service rejects an upload without a usable `detail`.
pub const ANALYSIS_FAILED: &str = "Errore durante l'analisi del menu";

/// Shown when the analysis service cannot be reached or answers with garbage.
pub const CONNECTION_FAILED: &str = "Errore di connessione al server";

/// Everything the user can see go wrong. `Display` is the text of the error panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Tipo di file non supportato. Usa PNG o JPG.")]
    UnsupportedType,

    #[error("File troppo grande. Dimensione massima: 10MB")]
    TooLarge,

    #[error("{0}")]
    RemoteFailure(String),
}

impl MenuError {
    pub fn analysis_failed() -> Self {
        MenuError::RemoteFailure(ANALYSIS_FAILED.to_string())
    }

    pub fn connection_failed() -> Self {
        MenuError::RemoteFailure(CONNECTION_FAILED.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}
