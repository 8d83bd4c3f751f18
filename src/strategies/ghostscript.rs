//! # Ghostscript Strategy
//!
//! Questo modulo gestisce la compressione tramite il tool esterno Ghostscript.
//!
//! ## Responsabilità:
//! - Risoluzione del binario (`gs`, o `gswin64c`/`gswin32c` su Windows)
//! - Costruzione degli argomenti `pdfwrite` a partire dal preset di qualità
//! - Esecuzione con cattura di stdout/stderr e timeout rigido
//! - Lettura delle dimensioni di input e output dal filesystem
//!
//! ## Preset di qualità:
//! - `screen`: 72 dpi, massima compressione
//! - `ebook`: 150 dpi (default)
//! - `printer` / `prepress`: 300 dpi
//! - `extreme`: come screen, compatibilità 1.3, deduplica immagini e font
//! - `smart`: risoluzione immagini e qualità JPEG scelte in base alla
//!   dimensione del documento (110/30 oltre 15MB, 140/45 oltre 5MB,
//!   180/55 sopra 2MB, 200/70 per documenti compatti)
//!
//! ## Gestione errori:
//! - Binario assente: `Failure` con istruzioni di installazione
//! - Exit status non zero: `Failure` con lo stderr catturato
//! - Timeout: il processo viene terminato (`kill_on_drop`) e il tentativo fallisce
//!
//! Ghostscript scrive su un file temporaneo accanto all'output, promosso solo
//! dopo un'uscita pulita.

use crate::analysis::{DocumentProfile, SmartSettings};
use crate::compressor::{CompressionRequest, StrategyOutcome};
use crate::config::{Config, QualityPreset};
use crate::error::PdfFitError;
use crate::file_manager::FileManager;
use crate::strategies::CompressionStrategy;
use crate::tool_resolver::ToolPathResolver;
use crate::utils::{path_flag, to_string_vec};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Compresses documents with an external Ghostscript process
pub struct GhostscriptStrategy {
    binary: String,
    compatibility_level: String,
    preset: QualityPreset,
    timeout: Duration,
    resolver: ToolPathResolver,
}

impl GhostscriptStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            binary: config.ghostscript_binary.clone(),
            compatibility_level: config.compatibility_level.clone(),
            preset: config.preset,
            timeout: config.external_timeout(),
            resolver: ToolPathResolver::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_resolver(mut self, resolver: ToolPathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Argument list for one Ghostscript run.
    ///
    /// `smart` carries the image settings picked for the `smart` preset.
    pub fn build_args(
        &self,
        preset: QualityPreset,
        smart: Option<SmartSettings>,
        input: &Path,
        output: &Path,
    ) -> Vec<String> {
        let compatibility = match preset {
            QualityPreset::Extreme => "1.3",
            _ => self.compatibility_level.as_str(),
        };

        let mut args = to_string_vec([
            "-sDEVICE=pdfwrite".to_string(),
            format!("-dCompatibilityLevel={}", compatibility),
            format!("-dPDFSETTINGS={}", preset.pdf_settings()),
        ]);

        if preset == QualityPreset::Extreme {
            args.extend(crate::args![
                "-dDownsampleColorImages=true",
                "-dColorImageResolution=72",
                "-dDetectDuplicateImages=true",
                "-dCompressFonts=true",
            ]);
        }

        if let (QualityPreset::Smart, Some(settings)) = (preset, smart) {
            args.extend(crate::args![
                "-dDownsampleColorImages=true",
                format!("-dColorImageResolution={}", settings.dpi),
                format!("-dJPEGQ={}", settings.jpeg_quality),
            ]);
        }

        args.extend(to_string_vec(["-dNOPAUSE", "-dQUIET", "-dBATCH"]));
        args.push(path_flag("-sOutputFile", output));
        args.push(input.to_string_lossy().into_owned());
        args
    }

    async fn run(&self, request: &CompressionRequest) -> Result<StrategyOutcome, PdfFitError> {
        let binary = self
            .resolver
            .check_tool_with_instructions(&self.binary)
            .map_err(|msg| PdfFitError::MissingDependency(format!("Ghostscript not found. {}", msg)))?;

        let preset = self.preset;
        let smart = match preset {
            QualityPreset::Smart => {
                let profile = DocumentProfile::from_path(request.input()).await?;
                debug!(
                    "Document classified as {} ({} images, {} fonts)",
                    profile.size_class.description(),
                    profile.image_objects,
                    profile.font_objects
                );
                Some(profile.smart_settings())
            }
            _ => None,
        };

        let staged = FileManager::staging_path(request.output())?;
        let args = self.build_args(preset, smart, request.input(), &staged);
        debug!("Running {:?} {:?}", binary, args);

        let mut cmd = Command::new(&binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_time = Instant::now();
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(PdfFitError::Timeout(format!(
                    "Ghostscript did not finish within {}s and was terminated",
                    self.timeout.as_secs_f64()
                )))
            }
        };
        let elapsed = start_time.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(PdfFitError::ExternalTool(message));
        }

        if FileManager::file_size(&staged).await? == 0 {
            return Err(PdfFitError::ExternalTool("produced an empty file".to_string()));
        }

        FileManager::promote(staged, request.output())?;

        let original_size = FileManager::file_size(request.input()).await?;
        let compressed_size = FileManager::file_size(request.output()).await?;
        debug!("Ghostscript finished in {:?}", elapsed);

        let mut outcome = StrategyOutcome::success(original_size, compressed_size)
            .with_extra("preset", preset.name())
            .with_extra("pdf_settings", preset.pdf_settings())
            .with_extra("elapsed_ms", elapsed.as_millis() as u64);
        if let Some(settings) = smart {
            outcome = outcome
                .with_extra("smart_profile", settings.profile)
                .with_extra("dpi", settings.dpi)
                .with_extra("jpeg_quality", settings.jpeg_quality);
        }
        Ok(outcome)
    }
}

impl CompressionStrategy for GhostscriptStrategy {
    fn attempt<'a>(&'a self, request: &'a CompressionRequest) -> BoxFuture<'a, StrategyOutcome> {
        self.run(request).map(StrategyOutcome::from).boxed()
    }
}
