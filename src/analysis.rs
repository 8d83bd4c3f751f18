//! # Document Analysis Module
//!
//! Analisi leggera del documento prima della compressione.
//!
//! ## Responsabilità:
//! - Classifica il documento per dimensione (compact/standard/large/huge)
//! - Conta oggetti immagine e font direttamente nei byte del file
//! - Rileva trasparenze (`/SMask`)
//! - Sceglie risoluzione immagini e qualità JPEG per la modalità `smart`
//!
//! L'analisi non interpreta il PDF: lavora sui byte grezzi ed è quindi
//! utilizzabile anche su documenti che lopdf non riesce a leggere.

use serde::Serialize;
use std::path::Path;

const MB: u64 = 1024 * 1024;

/// Classificazione del documento per dimensione
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Compact,  // < 2MB
    Standard, // 2MB - 5MB
    Large,    // 5MB - 15MB
    Huge,     // >= 15MB
}

/// Ghostscript image settings chosen by the `smart` preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SmartSettings {
    /// Colour image downsampling target
    pub dpi: u32,
    /// Value passed to `-dJPEGQ`
    pub jpeg_quality: u32,
    pub profile: &'static str,
}

impl SizeClass {
    /// Classifica un file in base alla sua dimensione
    pub fn classify(size_bytes: u64) -> Self {
        if size_bytes >= 15 * MB {
            Self::Huge
        } else if size_bytes >= 5 * MB {
            Self::Large
        } else if size_bytes < 2 * MB {
            Self::Compact
        } else {
            Self::Standard
        }
    }

    /// Impostazioni Ghostscript per la modalità smart
    pub fn smart_settings(&self) -> SmartSettings {
        let (dpi, jpeg_quality, profile) = match self {
            Self::Huge => (110, 30, "aggressive"),
            Self::Large => (140, 45, "balanced"),
            Self::Standard => (180, 55, "standard"),
            Self::Compact => (200, 70, "light-touch"),
        };
        SmartSettings {
            dpi,
            jpeg_quality,
            profile,
        }
    }

    /// Descrizione per il logging
    pub fn description(&self) -> &'static str {
        match self {
            Self::Compact => "compact (<2MB)",
            Self::Standard => "standard (2-5MB)",
            Self::Large => "large (5-15MB)",
            Self::Huge => "huge (>=15MB)",
        }
    }
}

/// Raw-byte profile of a PDF document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentProfile {
    pub size_bytes: u64,
    pub size_class: SizeClass,
    pub image_objects: usize,
    pub font_objects: usize,
    pub has_transparency: bool,
}

impl DocumentProfile {
    /// Profile an in-memory document
    pub fn from_bytes(content: &[u8]) -> Self {
        let size_bytes = content.len() as u64;
        Self {
            size_bytes,
            size_class: SizeClass::classify(size_bytes),
            image_objects: count_occurrences(content, b"/Subtype /Image")
                + count_occurrences(content, b"/Subtype/Image"),
            font_objects: count_occurrences(content, b"/Font"),
            has_transparency: count_occurrences(content, b"/SMask") > 0,
        }
    }

    /// Profile a document on disk
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&content))
    }

    /// Settings for the `smart` preset
    pub fn smart_settings(&self) -> SmartSettings {
        self.size_class.smart_settings()
    }
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
