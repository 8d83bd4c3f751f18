//! # Progress Feedback Module
//!
//! Feedback visivo durante i tentativi di compressione.
//!
//! ## Responsabilità:
//! - Spinner animato con `indicatif` mentre una strategia è in esecuzione
//! - Messaggio finale per ogni tentativo (riuscito o fallito)
//! - Modalità silenziosa per output JSON, `--test` e test automatici
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:03] Attempting external-tool compression...
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Spinner shown while one strategy runs
pub struct AttemptSpinner {
    bar: ProgressBar,
}

impl AttemptSpinner {
    /// Start a spinner for `method`; hidden when `enabled` is false
    pub fn start(method: &str, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(format!("Attempting {} compression...", method));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Stop the spinner and remove it from the terminal
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
