//! # Compression Request
//!
//! Centralizza la logica di calcolo del path di output.
//!
//! Quando l'utente non specifica un output, il path viene derivato dal file
//! di input: `<stem>_compressed_<unixtime><ext>` nella stessa directory.

use crate::error::PdfFitError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Input and output paths of one compression session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    input: PathBuf,
    output: PathBuf,
}

impl CompressionRequest {
    /// Build a request, deriving the output path from the current time if needed
    pub fn new(input: impl Into<PathBuf>, output: Option<PathBuf>) -> Result<Self, PdfFitError> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::with_timestamp(input, output, now)
    }

    /// Build a request with an explicit generation timestamp
    pub fn with_timestamp(
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
        unix_secs: u64,
    ) -> Result<Self, PdfFitError> {
        let input = input.into();
        let output = output.unwrap_or_else(|| derive_output_path(&input, unix_secs));

        if same_file(&input, &output) {
            return Err(PdfFitError::Validation(format!(
                "Output path must differ from input path: {}",
                input.display()
            )));
        }

        debug!("Resolved output path: {} -> {}", input.display(), output.display());
        Ok(Self { input, output })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// `<stem>_compressed_<unix_secs><ext>` next to the input
pub fn derive_output_path(input: &Path, unix_secs: u64) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let filename = match input.extension() {
        Some(ext) => format!("{}_compressed_{}.{}", stem, unix_secs, ext.to_string_lossy()),
        None => format!("{}_compressed_{}", stem, unix_secs),
    };

    input.with_file_name(filename)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
