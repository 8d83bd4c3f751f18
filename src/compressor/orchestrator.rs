//! # Compression Orchestrator
//!
//! Questo modulo coordina la catena di fallback delle strategie.
//!
//! ## Responsabilità:
//! - Mantiene la lista ordinata delle strategie (priorità fissa)
//! - Esegue i tentativi uno alla volta, fermandosi al primo successo
//! - Registra ogni fallimento con il nome della strategia
//! - Mantiene lo score della sessione (+10 per ogni compressione riuscita)
//!
//! ## Flusso:
//! 1. `Attempting <name> compression` (INFO)
//! 2. Tentativo protetto: un panic diventa un `Failure`
//! 3. Fallimento: WARN, pulizia dell'output, passa alla strategia successiva
//! 4. Successo: score aggiornato e ritorno immediato
//! 5. Catena esaurita: `Failure` con un dettaglio per ogni strategia
//!
//! ## Esempio:
//! ```rust,ignore
//! let request = CompressionRequest::new("report.pdf", None)?;
//! let mut orchestrator = CompressionOrchestrator::with_default_chain(request, &config)?;
//! let result = orchestrator.compress().await;
//! ```

use crate::compressor::outcome::{MethodFailure, SessionResult, StrategyOutcome, ALL_METHODS_FAILED};
use crate::compressor::CompressionRequest;
use crate::config::Config;
use crate::error::PdfFitError;
use crate::file_manager::FileManager;
use crate::progress::AttemptSpinner;
use crate::strategies::{
    CompressionStrategy, GhostscriptStrategy, LopdfStrategy, RemoteStrategy, EXTERNAL_TOOL, LIBRARY,
    REMOTE_SERVICE,
};
use futures::FutureExt;
use std::any::Any;
use std::io::IsTerminal;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

/// Score added for every successful compression
pub const SCORE_INCREMENT: u32 = 10;

/// A named strategy in the fallback chain
pub struct StrategyDescriptor {
    pub name: String,
    pub strategy: Box<dyn CompressionStrategy>,
}

/// Runs strategies in priority order until one succeeds
pub struct CompressionOrchestrator {
    request: CompressionRequest,
    strategies: Vec<StrategyDescriptor>,
    score: u32,
    show_progress: bool,
}

impl CompressionOrchestrator {
    /// Orchestrator with an empty chain
    pub fn new(request: CompressionRequest) -> Self {
        Self {
            request,
            strategies: Vec::new(),
            score: 0,
            show_progress: false,
        }
    }

    /// Standard chain: external tool, then library, then remote service
    pub fn with_default_chain(request: CompressionRequest, config: &Config) -> Result<Self, PdfFitError> {
        let mut orchestrator =
            Self::new(request).with_progress(config.show_progress && std::io::stderr().is_terminal());

        orchestrator
            .add_strategy(EXTERNAL_TOOL, GhostscriptStrategy::new(config))?
            .add_strategy(LIBRARY, LopdfStrategy::new())?
            .add_strategy(REMOTE_SERVICE, RemoteStrategy::from_config(config)?)?;

        Ok(orchestrator)
    }

    /// Append a strategy at the lowest priority
    pub fn add_strategy(
        &mut self,
        name: &str,
        strategy: impl CompressionStrategy + 'static,
    ) -> Result<&mut Self, PdfFitError> {
        if self.strategies.iter().any(|d| d.name == name) {
            return Err(PdfFitError::Config(format!("Duplicate strategy name: {}", name)));
        }

        self.strategies.push(StrategyDescriptor {
            name: name.to_string(),
            strategy: Box::new(strategy),
        });
        Ok(self)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn request(&self) -> &CompressionRequest {
        &self.request
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|d| d.name.as_str()).collect()
    }

    /// Try every strategy in order and return the first success
    pub async fn compress(&mut self) -> SessionResult {
        let output = self.request.output().to_path_buf();
        let output_preexisted = output.exists();
        let mut failures = Vec::with_capacity(self.strategies.len());

        for descriptor in &self.strategies {
            info!("Attempting {} compression", descriptor.name);
            let spinner = AttemptSpinner::start(&descriptor.name, self.show_progress);

            let outcome = AssertUnwindSafe(descriptor.strategy.attempt(&self.request))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    StrategyOutcome::failure(format!("panicked: {}", panic_message(payload.as_ref())))
                });
            spinner.finish();

            match outcome {
                StrategyOutcome::Failure { message } => {
                    let message = if message.trim().is_empty() {
                        "unknown error".to_string()
                    } else {
                        message
                    };
                    warn!("{} failed: {}", descriptor.name, message);

                    if !output_preexisted {
                        match FileManager::remove_if_exists(&output).await {
                            Ok(true) => debug!("Removed leftover output {}", output.display()),
                            Ok(false) => {}
                            Err(e) => warn!("Could not remove leftover output {}: {}", output.display(), e),
                        }
                    }

                    failures.push(MethodFailure {
                        method: descriptor.name.clone(),
                        message,
                    });
                }
                success => {
                    self.score += SCORE_INCREMENT;
                    info!("{} compression succeeded (score: {})", descriptor.name, self.score);
                    return SessionResult::Success {
                        method_name: descriptor.name.clone(),
                        outcome: success,
                        score: self.score,
                        output_path: output,
                    };
                }
            }
        }

        SessionResult::Failure {
            message: ALL_METHODS_FAILED.to_string(),
            per_method_details: failures,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
