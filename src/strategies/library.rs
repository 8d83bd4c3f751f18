//! # Library Strategy
//!
//! Compressione in-process con `lopdf`, usata quando Ghostscript non è
//! disponibile o fallisce.
//!
//! ## Pipeline:
//! 1. Carica il documento di input
//! 2. Comprime (flate) i content stream di ogni pagina
//! 3. Scrive tutte le pagine in un nuovo documento accanto all'output
//! 4. Promuove il file temporaneo sull'output
//!
//! Il lavoro è CPU-bound e gira su un thread bloccante: un panic dentro
//! lopdf diventa un `Failure` invece di terminare la sessione.

use crate::compressor::{CompressionRequest, StrategyOutcome};
use crate::error::PdfFitError;
use crate::file_manager::FileManager;
use crate::strategies::CompressionStrategy;
use futures::future::BoxFuture;
use futures::FutureExt;
use lopdf::{Document, Object};
use std::path::Path;
use tracing::debug;

/// Lossless content-stream compression with lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfStrategy;

/// What a compression pass touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub pages: usize,
    pub streams: usize,
}

impl LopdfStrategy {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, request: &CompressionRequest) -> Result<StrategyOutcome, PdfFitError> {
        let staged = FileManager::staging_path(request.output())?;
        let input = request.input().to_path_buf();
        let target = staged.to_path_buf();

        let stats = tokio::task::spawn_blocking(move || compress_document(&input, &target))
            .await
            .map_err(|e| PdfFitError::Pdf(format!("PDF worker crashed: {}", e)))??;

        FileManager::promote(staged, request.output())?;

        let original_size = FileManager::file_size(request.input()).await?;
        let compressed_size = FileManager::file_size(request.output()).await?;

        Ok(StrategyOutcome::success(original_size, compressed_size)
            .with_extra("pages", stats.pages as u64)
            .with_extra("streams_compressed", stats.streams as u64))
    }
}

impl CompressionStrategy for LopdfStrategy {
    fn attempt<'a>(&'a self, request: &'a CompressionRequest) -> BoxFuture<'a, StrategyOutcome> {
        self.run(request).map(StrategyOutcome::from).boxed()
    }
}

/// Compress every page content stream of `input` and write the result to `output`
pub fn compress_document(input: &Path, output: &Path) -> Result<PassStats, PdfFitError> {
    let mut doc = Document::load(input)
        .map_err(|e| PdfFitError::Pdf(format!("cannot parse {}: {}", input.display(), e)))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfFitError::Pdf(format!("{} has no pages", input.display())));
    }

    let mut streams = 0;
    for (page_number, page_id) in &pages {
        for content_id in doc.get_page_contents(*page_id) {
            if let Ok(Object::Stream(stream)) = doc.get_object_mut(content_id) {
                stream
                    .compress()
                    .map_err(|e| PdfFitError::Pdf(format!("page {}: {}", page_number, e)))?;
                streams += 1;
            }
        }
    }
    debug!("Compressed {} content streams across {} pages", streams, pages.len());

    doc.save(output)
        .map_err(|e| PdfFitError::Pdf(format!("cannot write {}: {}", output.display(), e)))?;

    Ok(PassStats {
        pages: pages.len(),
        streams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_sample_pdf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_valid_document_is_compressed() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sample.pdf");
        write_sample_pdf(&input, 3);
        let request = CompressionRequest::with_timestamp(&input, None, 1).unwrap();

        let outcome = LopdfStrategy::new().attempt(&request).await;

        match outcome {
            StrategyOutcome::Success {
                original_size,
                compressed_size,
                extra,
            } => {
                assert_eq!(original_size, std::fs::metadata(&input).unwrap().len());
                assert_eq!(compressed_size, std::fs::metadata(request.output()).unwrap().len());
                assert_eq!(extra["pages"], 3);
            }
            other => panic!("expected success, got {:?}", other),
        }

        let reloaded = Document::load(request.output()).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"this is not a pdf at all").unwrap();
        let request = CompressionRequest::with_timestamp(&input, None, 1).unwrap();

        match LopdfStrategy::new().attempt(&request).await {
            StrategyOutcome::Failure { message } => assert!(message.contains("cannot parse")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!request.output().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_compress_document_counts_streams() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sample.pdf");
        let output = dir.path().join("out.pdf");
        write_sample_pdf(&input, 2);

        let stats = compress_document(&input, &output).unwrap();
        assert_eq!(stats, PassStats { pages: 2, streams: 2 });
    }
}
