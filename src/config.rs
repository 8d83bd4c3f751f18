//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri delle strategie di compressione
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `expected_extension`: Estensione documento accettata (default: "pdf")
//! - `ghostscript_binary`: Nome o path del binario Ghostscript (default: "gs")
//! - `compatibility_level`: Livello di compatibilità PDF per Ghostscript (default: "1.4")
//! - `preset`: Preset di qualità Ghostscript (default: ebook)
//! - `external_timeout_secs`: Timeout per Ghostscript (default: 120)
//! - `api_key_env`: Variabile d'ambiente con la credenziale remota (default: "PDF_COMPRESS_API_KEY")
//! - `api_url`: Endpoint del servizio remoto
//! - `api_timeout_secs`: Timeout per la chiamata remota (default: 30)
//! - `log_file`: File di log append-only (default: "pdf_compressor.log")
//! - `show_progress`: Spinner durante i tentativi (default: true)
//!
//! ## Validazione:
//! - Controlla che i timeout siano > 0
//! - Controlla che binario, estensione e nome variabile non siano vuoti
//! - Controlla che compatibility_level sia nella forma "1.x"
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     preset: QualityPreset::Screen,
//!     external_timeout_secs: 60,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the remote service credential
pub const API_KEY_ENV: &str = "PDF_COMPRESS_API_KEY";
/// Environment variable overriding the remote service endpoint
pub const API_URL_ENV: &str = "PDF_COMPRESS_API_URL";
/// Default remote service endpoint
pub const DEFAULT_API_URL: &str = "https://api.example.com/compress";
/// Default log file, relative to the working directory
pub const LOG_FILE: &str = "pdf_compressor.log";

/// Ghostscript quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// 72 dpi, smallest output
    Screen,
    /// 150 dpi, good balance
    Ebook,
    /// 300 dpi
    Printer,
    /// 300 dpi, colour preserving
    Prepress,
    /// Screen settings plus aggressive image and font deduplication
    Extreme,
    /// Image resolution and JPEG quality picked from the document size
    Smart,
}

impl QualityPreset {
    /// Value passed to `-dPDFSETTINGS`
    pub fn pdf_settings(&self) -> &'static str {
        match self {
            Self::Screen | Self::Extreme => "/screen",
            Self::Ebook => "/ebook",
            Self::Smart => "/default",
            Self::Printer => "/printer",
            Self::Prepress => "/prepress",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
            Self::Extreme => "extreme",
            Self::Smart => "smart",
        }
    }
}

/// Configuration for PDF compression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accepted document extension (case-insensitive, without dot)
    pub expected_extension: String,
    /// Ghostscript binary name or path
    pub ghostscript_binary: String,
    /// PDF compatibility level passed to Ghostscript
    pub compatibility_level: String,
    /// Ghostscript quality preset
    pub preset: QualityPreset,
    /// Hard wall-clock limit for the Ghostscript process
    pub external_timeout_secs: u64,
    /// Environment variable holding the remote service credential
    pub api_key_env: String,
    /// Remote service endpoint (None = PDF_COMPRESS_API_URL or built-in default)
    pub api_url: Option<String>,
    /// Limit for the whole remote round trip
    pub api_timeout_secs: u64,
    /// Append-only log file
    pub log_file: PathBuf,
    /// Show a spinner while each strategy runs
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_extension: "pdf".to_string(),
            ghostscript_binary: "gs".to_string(),
            compatibility_level: "1.4".to_string(),
            preset: QualityPreset::Ebook,
            external_timeout_secs: 120,
            api_key_env: API_KEY_ENV.to_string(),
            api_url: None,
            api_timeout_secs: 30,
            log_file: PathBuf::from(LOG_FILE),
            show_progress: true,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.expected_extension.trim().is_empty() {
            return Err(anyhow::anyhow!("Expected extension must not be empty"));
        }

        if self.ghostscript_binary.trim().is_empty() {
            return Err(anyhow::anyhow!("Ghostscript binary must not be empty"));
        }

        if !is_valid_compatibility_level(&self.compatibility_level) {
            return Err(anyhow::anyhow!(
                "Compatibility level must look like 1.x, got '{}'",
                self.compatibility_level
            ));
        }

        if self.external_timeout_secs == 0 {
            return Err(anyhow::anyhow!("External tool timeout must be greater than 0"));
        }

        if self.api_timeout_secs == 0 {
            return Err(anyhow::anyhow!("API timeout must be greater than 0"));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(anyhow::anyhow!("API key environment variable name must not be empty"));
        }

        if let Some(ref url) = self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("API URL must be http(s): {}", url));
            }
        }

        Ok(())
    }

    pub fn external_timeout(&self) -> Duration {
        Duration::from_secs(self.external_timeout_secs)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Endpoint for the remote service: config, then environment, then default
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Default config file location (`<config_dir>/pdf-fit/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pdf-fit").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

fn is_valid_compatibility_level(level: &str) -> bool {
    match level.split_once('.') {
        Some((major, minor)) => {
            major == "1" && !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
