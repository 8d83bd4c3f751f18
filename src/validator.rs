//! # Input Validation
//!
//! Controllo preliminare del file di input prima di avviare la catena:
//! - il path deve esistere ed essere un file regolare
//! - l'estensione deve corrispondere (case-insensitive) a quella attesa
//!
//! In caso di rifiuto viene emesso un solo log ERROR; l'orchestratore non
//! ripete la validazione.

use crate::config::Config;
use crate::error::PdfFitError;
use crate::file_manager::FileManager;
use std::path::Path;
use tracing::error;

/// Checks that a path points at a document the chain can work on
#[derive(Debug, Clone)]
pub struct InputValidator {
    expected_extension: String,
}

impl InputValidator {
    pub fn new(expected_extension: impl Into<String>) -> Self {
        Self {
            expected_extension: expected_extension.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.expected_extension.clone())
    }

    /// Reason why `path` is not acceptable
    pub fn check(&self, path: &Path) -> Result<(), PdfFitError> {
        let metadata = std::fs::metadata(path).map_err(|_| {
            PdfFitError::Validation(format!("Input file does not exist: {}", path.display()))
        })?;

        if !metadata.is_file() {
            return Err(PdfFitError::Validation(format!(
                "Input is not a regular file: {}",
                path.display()
            )));
        }

        if !FileManager::has_extension(path, &self.expected_extension) {
            return Err(PdfFitError::Validation(format!(
                "Not a valid {} file: {}",
                self.expected_extension.to_uppercase(),
                path.display()
            )));
        }

        Ok(())
    }

    /// `true` when the input is acceptable; logs one error otherwise
    pub fn validate(&self, path: &Path) -> bool {
        match self.check(path) {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
