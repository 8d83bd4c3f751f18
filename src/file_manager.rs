//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file condivise dalle strategie.
//!
//! ## Responsabilità:
//! - Determinazione formato file (documento atteso vs altro)
//! - Lettura dimensioni dei file dopo la compressione
//! - File temporanei accanto all'output, promossi solo in caso di successo
//! - Utilità per calcoli dimensioni e percentuali
//! - Formattazione human-readable delle dimensioni
//!
//! ## Sicurezza operazioni:
//! - Ogni strategia scrive su un file temporaneo nella directory di output
//! - Il file temporaneo viene rinominato sull'output solo a compressione riuscita
//! - In caso di errore il file temporaneo viene rimosso automaticamente (drop)
//!
//! ## Esempio:
//! ```rust,ignore
//! let staging = FileManager::staging_path(&output)?;
//! run_tool(&input, &staging)?;
//! FileManager::promote(staging, &output)?;
//! ```

use std::path::Path;
use tempfile::TempPath;
use tokio::fs;

/// Manages file operations
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64, std::io::Error> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Check if a file carries the expected extension (case-insensitive)
    pub fn has_extension(path: &Path, expected: &str) -> bool {
        let expected = expected.trim_start_matches('.');
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }

    /// Reserve a temporary file in the output directory.
    ///
    /// The file is deleted when the returned `TempPath` is dropped, so a failed
    /// attempt never leaves anything behind.
    pub fn staging_path(output: &Path) -> Result<TempPath, std::io::Error> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = tempfile::Builder::new()
            .prefix(".pdf-fit-")
            .suffix(".pdf")
            .tempfile_in(dir)?;
        Ok(file.into_temp_path())
    }

    /// Move a staged file onto the final output path
    pub fn promote(staged: TempPath, output: &Path) -> Result<(), std::io::Error> {
        staged.persist(output).map_err(|e| e.error)
    }

    /// Remove a file, ignoring "not found"
    pub async fn remove_if_exists(path: &Path) -> Result<bool, std::io::Error> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage reduction, `(1 - new/original) * 100`
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            (1.0 - (new_size as f64 / original_size as f64)) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension_is_case_insensitive() {
        assert!(FileManager::has_extension(Path::new("report.PDF"), "pdf"));
        assert!(FileManager::has_extension(Path::new("report.pdf"), ".pdf"));
        assert!(!FileManager::has_extension(Path::new("report.docx"), "pdf"));
        assert!(!FileManager::has_extension(Path::new("report"), "pdf"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert!((FileManager::calculate_reduction(1000, 250) - 75.0).abs() < 1e-9);
        assert!(FileManager::calculate_reduction(100, 150) < 0.0);
    }

    #[test]
    fn test_staging_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.pdf");

        let staged = FileManager::staging_path(&output).unwrap();
        let staged_path = staged.to_path_buf();
        assert!(staged_path.exists());
        drop(staged);

        assert!(!staged_path.exists());
        assert!(!output.exists());
    }

    #[test]
    fn test_promote_moves_onto_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.pdf");

        let staged = FileManager::staging_path(&output).unwrap();
        std::fs::write(&staged, b"%PDF-1.4").unwrap();
        FileManager::promote(staged, &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_remove_if_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leftover.pdf");
        std::fs::write(&path, b"partial").unwrap();

        assert!(FileManager::remove_if_exists(&path).await.unwrap());
        assert!(!FileManager::remove_if_exists(&path).await.unwrap());
    }
}
