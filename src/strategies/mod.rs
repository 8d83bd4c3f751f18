//! # Compression Strategies
//!
//! Ogni strategia sa comprimere un documento in un path di output e riporta
//! un `StrategyOutcome` uniforme:
//! - `ghostscript`: invocazione del tool esterno Ghostscript (con timeout)
//! - `library`: compressione in-process dei content stream con lopdf
//! - `remote`: servizio di compressione remoto protetto da API key
//!
//! Nessuna strategia propaga errori: ogni problema diventa `Failure`.

pub mod ghostscript;
pub mod library;
pub mod remote;

pub use ghostscript::GhostscriptStrategy;
pub use library::LopdfStrategy;
pub use remote::{CompressionService, HttpCompressionService, RemoteStrategy, ServiceResponse};

use crate::compressor::{CompressionRequest, StrategyOutcome};
use futures::future::BoxFuture;

/// Name of the external tool strategy in the default chain
pub const EXTERNAL_TOOL: &str = "external-tool";
/// Name of the in-process library strategy in the default chain
pub const LIBRARY: &str = "library";
/// Name of the remote service strategy in the default chain
pub const REMOTE_SERVICE: &str = "remote-service";

/// One way of compressing a document.
///
/// Implementations must not panic or return early with an error: every
/// problem is reported as `StrategyOutcome::Failure`. They must also leave
/// the output path untouched unless they succeed.
pub trait CompressionStrategy: Send + Sync {
    fn attempt<'a>(&'a self, request: &'a CompressionRequest) -> BoxFuture<'a, StrategyOutcome>;
}
