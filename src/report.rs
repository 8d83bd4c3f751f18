//! # Session Report
//!
//! Trasforma un `SessionResult` nel testo mostrato all'utente.
//!
//! ## Formati:
//! - `render`: riepilogo leggibile (metodo, dimensioni, riduzione, score)
//! - `render_json`: il risultato serializzato, con tag `status`
//! - `render_score`: la sola riga di score usata da `--test`

use crate::compressor::{SessionResult, StrategyOutcome};
use crate::file_manager::FileManager;
use anyhow::Result;
use std::fmt::Write;

/// Formats session results for the terminal
pub struct SessionReporter;

impl SessionReporter {
    pub fn render(result: &SessionResult) -> String {
        let mut out = String::new();

        match result {
            SessionResult::Success {
                method_name,
                outcome,
                score,
                output_path,
            } => {
                let _ = writeln!(out, "✅ Compression successful using {}", method_name);
                if let StrategyOutcome::Success {
                    original_size,
                    compressed_size,
                    ..
                } = outcome
                {
                    let _ = writeln!(
                        out,
                        "Original size: {} bytes ({})",
                        original_size,
                        FileManager::format_size(*original_size)
                    );
                    let _ = writeln!(
                        out,
                        "Compressed size: {} bytes ({})",
                        compressed_size,
                        FileManager::format_size(*compressed_size)
                    );
                    let _ = writeln!(
                        out,
                        "Reduction: {:.1}%",
                        FileManager::calculate_reduction(*original_size, *compressed_size)
                    );
                }
                let _ = writeln!(out, "Output: {}", output_path.display());
                let _ = write!(out, "Score: {}", score);
            }
            SessionResult::Failure {
                message,
                per_method_details,
            } => {
                let _ = write!(out, "❌ Compression failed: {}", message);
                for failure in per_method_details {
                    let _ = write!(out, "\n  - {}: {}", failure.method, failure.message);
                }
            }
        }

        out
    }

    pub fn render_json(result: &SessionResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    pub fn render_score(result: &SessionResult) -> String {
        format!("Test completed with score: {}", result.score())
    }
}
