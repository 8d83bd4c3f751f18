//! # Remote Service Strategy
//!
//! Ultima risorsa della catena: invia il documento a un servizio di
//! compressione remoto.
//!
//! ## Contratto HTTP (`HttpCompressionService`):
//! - `POST <endpoint>` con il documento come body `application/pdf`
//! - Header `Authorization: Bearer <api key>`
//! - Risposta 2xx: il body è il PDF compresso
//! - Header opzionali `X-Original-Size` / `X-Compressed-Size`; se assenti si
//!   usano le lunghezze di richiesta e risposta
//!
//! ## Gestione errori:
//! - API key assente: `Failure` immediato, nessuna chiamata di rete
//! - Errori di rete, status non 2xx, body vuoto o non PDF: `Failure`
//! - L'intero round trip è limitato da un timeout (default 30s)
//!
//! Il trasporto è dietro al trait `CompressionService`, così la strategia è
//! testabile senza rete.

use crate::compressor::{CompressionRequest, StrategyOutcome};
use crate::config::Config;
use crate::error::PdfFitError;
use crate::file_manager::FileManager;
use crate::strategies::CompressionStrategy;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_ERROR_BODY: usize = 512;

/// Reply of a compression service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub original_size: u64,
    pub compressed_size: u64,
    pub document: Vec<u8>,
}

/// Transport to a remote compression service
pub trait CompressionService: Send + Sync {
    /// Endpoint description for logs and reports
    fn endpoint(&self) -> &str;

    fn compress<'a>(
        &'a self,
        api_key: &'a str,
        document: Vec<u8>,
    ) -> BoxFuture<'a, Result<ServiceResponse, PdfFitError>>;
}

/// HTTP implementation of the compression service contract
pub struct HttpCompressionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompressionService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PdfFitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| PdfFitError::Remote(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn send(&self, api_key: &str, document: Vec<u8>) -> Result<ServiceResponse, PdfFitError> {
        let request_len = document.len() as u64;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/pdf")
            .body(document)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PdfFitError::Timeout(format!("remote compression request timed out: {}", e))
                } else {
                    PdfFitError::Remote(format!("request to {} failed: {}", self.endpoint, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(PdfFitError::Remote(format!(
                "service returned {}: {}",
                status,
                body.trim()
            )));
        }

        let original_size = size_header(response.headers(), "x-original-size")?;
        let compressed_size = size_header(response.headers(), "x-compressed-size")?;

        let body = response
            .bytes()
            .await
            .map_err(|e| PdfFitError::Remote(format!("failed to read response body: {}", e)))?;

        Ok(ServiceResponse {
            original_size: original_size.unwrap_or(request_len),
            compressed_size: compressed_size.unwrap_or(body.len() as u64),
            document: body.to_vec(),
        })
    }
}

impl CompressionService for HttpCompressionService {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn compress<'a>(
        &'a self,
        api_key: &'a str,
        document: Vec<u8>,
    ) -> BoxFuture<'a, Result<ServiceResponse, PdfFitError>> {
        self.send(api_key, document).boxed()
    }
}

/// Cut `text` to at most `max` bytes without splitting a character
fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let cut = (0..=max).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
    text.truncate(cut);
}

fn size_header(headers: &HeaderMap, name: &str) -> Result<Option<u64>, PdfFitError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Some)
            .ok_or_else(|| PdfFitError::Remote(format!("malformed {} header", name))),
    }
}

/// Compresses documents through a remote service, guarded by an API key
pub struct RemoteStrategy {
    api_key_env: String,
    timeout: Duration,
    service: Arc<dyn CompressionService>,
}

impl RemoteStrategy {
    /// Strategy talking HTTP to the configured endpoint
    pub fn from_config(config: &Config) -> Result<Self, PdfFitError> {
        let service = HttpCompressionService::new(config.resolved_api_url(), config.api_timeout())?;
        Ok(Self::new(&config.api_key_env, config.api_timeout(), Arc::new(service)))
    }

    pub fn new(api_key_env: &str, timeout: Duration, service: Arc<dyn CompressionService>) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            timeout,
            service,
        }
    }

    fn api_key(&self) -> Result<String, PdfFitError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PdfFitError::MissingDependency(format!(
                    "API key not found. Set {} environment variable",
                    self.api_key_env
                ))
            })
    }

    async fn run(&self, request: &CompressionRequest) -> Result<StrategyOutcome, PdfFitError> {
        let api_key = self.api_key()?;
        let document = tokio::fs::read(request.input()).await?;
        debug!("Sending {} bytes to {}", document.len(), self.service.endpoint());

        let response = match tokio::time::timeout(self.timeout, self.service.compress(&api_key, document)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(PdfFitError::Timeout(format!(
                    "remote compression request timed out after {}s",
                    self.timeout.as_secs_f64()
                )))
            }
        };

        if response.document.is_empty() {
            return Err(PdfFitError::Remote("service returned an empty document".to_string()));
        }
        if !response.document.starts_with(b"%PDF-") {
            return Err(PdfFitError::Remote("service returned a body that is not a PDF".to_string()));
        }

        let staged = FileManager::staging_path(request.output())?;
        tokio::fs::write(&staged, &response.document).await?;
        FileManager::promote(staged, request.output())?;

        Ok(
            StrategyOutcome::success(response.original_size, response.compressed_size)
                .with_extra("endpoint", self.service.endpoint()),
        )
    }
}

impl CompressionStrategy for RemoteStrategy {
    fn attempt<'a>(&'a self, request: &'a CompressionRequest) -> BoxFuture<'a, StrategyOutcome> {
        self.run(request).map(StrategyOutcome::from).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// In-process service returning a canned reply
    struct FakeService {
        reply: Result<ServiceResponse, String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn replying(reply: Result<ServiceResponse, String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn hanging(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Err("should have timed out".to_string()),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl CompressionService for FakeService {
        fn endpoint(&self) -> &str {
            "fake://compress"
        }

        fn compress<'a>(
            &'a self,
            _api_key: &'a str,
            _document: Vec<u8>,
        ) -> BoxFuture<'a, Result<ServiceResponse, PdfFitError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(self.delay).await;
                self.reply.clone().map_err(PdfFitError::Remote)
            }
            .boxed()
        }
    }

    fn request_in(dir: &TempDir) -> CompressionRequest {
        let input = dir.path().join("doc.pdf");
        std::fs::write(&input, vec![b'%'; 1024]).unwrap();
        CompressionRequest::with_timestamp(&input, None, 9).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let service = FakeService::replying(Err("unused".to_string()));
        let env = "PDF_FIT_TEST_REMOTE_MISSING_KEY";
        std::env::remove_var(env);

        let strategy = RemoteStrategy::new(env, Duration::from_secs(1), service.clone());
        match strategy.attempt(&request).await {
            StrategyOutcome::Failure { message } => assert!(message.contains(env)),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_service_sizes_are_reported() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let env = "PDF_FIT_TEST_REMOTE_OK_KEY";
        std::env::set_var(env, "secret");

        let service = FakeService::replying(Ok(ServiceResponse {
            original_size: 1024,
            compressed_size: 512,
            document: b"%PDF-1.4 tiny".to_vec(),
        }));
        let strategy = RemoteStrategy::new(env, Duration::from_secs(1), service);

        let outcome = strategy.attempt(&request).await;
        assert_eq!(outcome.sizes(), Some((1024, 512)));
        assert_eq!(std::fs::read(request.output()).unwrap(), b"%PDF-1.4 tiny");
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let env = "PDF_FIT_TEST_REMOTE_TIMEOUT_KEY";
        std::env::set_var(env, "secret");

        let strategy = RemoteStrategy::new(
            env,
            Duration::from_millis(50),
            FakeService::hanging(Duration::from_secs(30)),
        );

        match strategy.attempt(&request).await {
            StrategyOutcome::Failure { message } => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!request.output().exists());
    }

    #[tokio::test]
    async fn test_non_pdf_reply_is_rejected() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let env = "PDF_FIT_TEST_REMOTE_HTML_KEY";
        std::env::set_var(env, "secret");

        let service = FakeService::replying(Ok(ServiceResponse {
            original_size: 1024,
            compressed_size: 15,
            document: b"<html>oops</html>".to_vec(),
        }));
        let strategy = RemoteStrategy::new(env, Duration::from_secs(1), service);

        match strategy.attempt(&request).await {
            StrategyOutcome::Failure { message } => assert!(message.contains("not a PDF")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!request.output().exists());
    }

    #[test]
    fn test_size_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(size_header(&headers, "x-original-size").unwrap(), None);

        headers.insert("x-original-size", "2048".parse().unwrap());
        assert_eq!(size_header(&headers, "x-original-size").unwrap(), Some(2048));

        headers.insert("x-compressed-size", "lots".parse().unwrap());
        assert!(size_header(&headers, "x-compressed-size").is_err());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let mut text = "€".repeat(200);
        truncate_on_char_boundary(&mut text, MAX_ERROR_BODY);
        assert_eq!(text.len(), 510);
        assert!(text.chars().all(|c| c == '€'));

        let mut short = "ok".to_string();
        truncate_on_char_boundary(&mut short, MAX_ERROR_BODY);
        assert_eq!(short, "ok");
    }

    /// One-shot HTTP server answering every request with `status` and `body`
    async fn serve_once(status: &'static str, body: String) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&received).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/compress", addr)
    }

    #[tokio::test]
    async fn test_error_body_with_multibyte_text_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let env = "PDF_FIT_TEST_REMOTE_MULTIBYTE_KEY";
        std::env::set_var(env, "secret");

        let endpoint = serve_once("500 Internal Server Error", "€".repeat(200)).await;
        let service = HttpCompressionService::new(endpoint, Duration::from_secs(5)).unwrap();
        let strategy = RemoteStrategy::new(env, Duration::from_secs(5), Arc::new(service));

        match strategy.attempt(&request).await {
            StrategyOutcome::Failure { message } => {
                assert!(message.contains("500"), "unexpected message: {}", message);
                assert!(message.contains('€'));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!request.output().exists());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let request = request_in(&dir);
        let env = "PDF_FIT_TEST_REMOTE_UNREACHABLE_KEY";
        std::env::set_var(env, "secret");

        // Port 9 on localhost (discard) is closed on test machines.
        let service = HttpCompressionService::new("http://127.0.0.1:9/compress", Duration::from_secs(2)).unwrap();
        let strategy = RemoteStrategy::new(env, Duration::from_secs(5), Arc::new(service));

        assert!(!strategy.attempt(&request).await.is_success());
        assert!(!request.output().exists());
    }
}
