//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `PdfFitError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi, riusati come messaggio di fallimento
//!   delle singole strategie
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Validation`: Input non valido (file mancante, estensione errata, output == input)
//! - `MissingDependency`: Tool esterno o credenziale mancante (gs, API key)
//! - `ExternalTool`: Ghostscript terminato con exit status non zero
//! - `Timeout`: Tool esterno o servizio remoto oltre il limite di tempo
//! - `Pdf`: Errori di parsing/scrittura del documento con lopdf
//! - `Remote`: Errori di rete o risposte non valide del servizio remoto
//! - `Config`: Configurazione non valida
//!
//! ## Esempio:
//! ```rust,ignore
//! if api_key.is_none() {
//!     return Err(PdfFitError::MissingDependency("API key not found".to_string()));
//! }
//! ```

/// Custom error types for PDF compression
#[derive(thiserror::Error, Debug)]
pub enum PdfFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Ghostscript failed: {0}")]
    ExternalTool(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
