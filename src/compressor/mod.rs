//! # Compressor Module
//!
//! Cuore della sessione di compressione:
//! - `request`: path di input e output (derivazione deterministica)
//! - `outcome`: risultati per tentativo e per sessione
//! - `orchestrator`: catena di fallback con score

pub mod orchestrator;
pub mod outcome;
pub mod request;

pub use orchestrator::{CompressionOrchestrator, StrategyDescriptor, SCORE_INCREMENT};
pub use outcome::{Extra, MethodFailure, SessionResult, StrategyOutcome, ALL_METHODS_FAILED};
pub use request::{derive_output_path, CompressionRequest};
