//! # Outcome Types
//!
//! Risultati di un singolo tentativo (`StrategyOutcome`) e dell'intera
//! sessione (`SessionResult`).

use crate::error::PdfFitError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Free-form details attached to a successful attempt
pub type Extra = BTreeMap<String, serde_json::Value>;

/// Message of the aggregated failure when every strategy failed
pub const ALL_METHODS_FAILED: &str = "All methods failed";

/// Result of one strategy attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StrategyOutcome {
    Success {
        original_size: u64,
        compressed_size: u64,
        extra: Extra,
    },
    Failure {
        message: String,
    },
}

impl StrategyOutcome {
    pub fn success(original_size: u64, compressed_size: u64) -> Self {
        Self::Success {
            original_size,
            compressed_size,
            extra: Extra::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Attach a detail to a success; no-op on failures
    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if let Self::Success { ref mut extra, .. } = self {
            extra.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Sizes of a successful attempt
    pub fn sizes(&self) -> Option<(u64, u64)> {
        match self {
            Self::Success {
                original_size,
                compressed_size,
                ..
            } => Some((*original_size, *compressed_size)),
            Self::Failure { .. } => None,
        }
    }
}

impl From<PdfFitError> for StrategyOutcome {
    fn from(err: PdfFitError) -> Self {
        Self::failure(err.to_string())
    }
}

impl From<Result<StrategyOutcome, PdfFitError>> for StrategyOutcome {
    fn from(result: Result<StrategyOutcome, PdfFitError>) -> Self {
        result.unwrap_or_else(StrategyOutcome::from)
    }
}

/// Failure recorded for one strategy of the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodFailure {
    pub method: String,
    pub message: String,
}

/// Final result of a compression session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SessionResult {
    Success {
        method_name: String,
        outcome: StrategyOutcome,
        score: u32,
        output_path: PathBuf,
    },
    Failure {
        message: String,
        /// One entry per attempted strategy, in priority order
        per_method_details: Vec<MethodFailure>,
    },
}

impl SessionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Score reached by the session (0 on failure)
    pub fn score(&self) -> u32 {
        match self {
            Self::Success { score, .. } => *score,
            Self::Failure { .. } => 0,
        }
    }

    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::Success { method_name, .. } => Some(method_name),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message recorded for a method
    pub fn failure_for(&self, method: &str) -> Option<&str> {
        match self {
            Self::Failure {
                per_method_details, ..
            } => per_method_details
                .iter()
                .find(|f| f.method == method)
                .map(|f| f.message.as_str()),
            Self::Success { .. } => None,
        }
    }

    /// Names of the failed methods, in the order they were tried
    pub fn failed_methods(&self) -> Vec<&str> {
        match self {
            Self::Failure {
                per_method_details, ..
            } => per_method_details.iter().map(|f| f.method.as_str()).collect(),
            Self::Success { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_becomes_failure() {
        let outcome: StrategyOutcome =
            Err::<StrategyOutcome, _>(PdfFitError::Pdf("bad xref".to_string())).into();
        assert_eq!(outcome, StrategyOutcome::failure("PDF error: bad xref"));
    }

    #[test]
    fn test_extra_only_on_success() {
        let ok = StrategyOutcome::success(100, 40).with_extra("pages", 3);
        match ok {
            StrategyOutcome::Success { ref extra, .. } => assert_eq!(extra["pages"], 3),
            _ => panic!("expected success"),
        }

        let failed = StrategyOutcome::failure("boom").with_extra("pages", 3);
        assert_eq!(failed, StrategyOutcome::failure("boom"));
    }

    #[test]
    fn test_session_result_json_shape() {
        let result = SessionResult::Failure {
            message: ALL_METHODS_FAILED.to_string(),
            per_method_details: vec![MethodFailure {
                method: "library".to_string(),
                message: "PDF error: no pages".to_string(),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["per_method_details"][0]["method"], "library");
        assert_eq!(result.failure_for("library"), Some("PDF error: no pages"));
        assert_eq!(result.score(), 0);
    }
}
