//! # pdf-fit Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione, preset di qualità e validazione parametri
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `validator`: Controllo del file di input
//! - `compressor`: Richiesta, risultati e orchestratore della catena di fallback
//! - `strategies`: Ghostscript, lopdf e servizio remoto
//! - `analysis`: Profilo del documento per il preset `smart`
//! - `file_manager`: File temporanei, dimensioni e formattazione
//! - `report`: Riepilogo testuale e JSON della sessione
//! - `logging` / `progress`: Log su file e stderr, spinner per i tentativi
//! - `cancel`: Interruzione della sessione su Ctrl+C
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use pdf_fit::{CompressionOrchestrator, CompressionRequest, Config, SessionReporter};
//!
//! let config = Config::default();
//! let request = CompressionRequest::new("report.pdf", None)?;
//! let mut orchestrator = CompressionOrchestrator::with_default_chain(request, &config)?;
//! let result = orchestrator.compress().await;
//! println!("{}", SessionReporter::render(&result));
//! ```

pub mod analysis;
pub mod cancel;
pub mod compressor;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod logging;
pub mod progress;
pub mod report;
pub mod strategies;
pub mod tool_resolver;
pub mod utils;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use compressor::{
    CompressionOrchestrator, CompressionRequest, MethodFailure, SessionResult, StrategyOutcome,
};
pub use config::{Config, QualityPreset};
pub use error::PdfFitError;
pub use report::SessionReporter;
pub use strategies::CompressionStrategy;
pub use validator::InputValidator;
