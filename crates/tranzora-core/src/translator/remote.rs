use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::response::TranslateResponse;
use super::traits::{DocumentUpload, TranslatedDocument, Translator, TranslatorInfo};
use crate::config::Lang;
use crate::error::{Error, Result};

/// Default number of retry attempts
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Default delay between retries in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// HTTP client for the remote translation service.
///
/// Issues a single multipart POST per document carrying the file, with the
/// target language and layout-preservation flag as query parameters.
pub struct RemoteTranslator {
    client: Client,
    /// Base URL for the service (e.g. "http://localhost:3000")
    pub api_base: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Number of retry attempts
    pub retry_count: u32,
    /// Delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl RemoteTranslator {
    /// Create a new remote translator with all options.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created, which should only happen
    /// in extreme circumstances (e.g., TLS backend unavailable on the system).
    #[allow(clippy::expect_used)]
    pub fn new(
        api_base: String,
        api_key: Option<String>,
        retry_count: u32,
        retry_delay_ms: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base,
            api_key,
            retry_count,
            retry_delay_ms,
        }
    }

    /// Create a new remote translator with default retry settings.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created.
    pub fn with_defaults(api_base: String, api_key: Option<String>) -> Self {
        Self::new(api_base, api_key, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_MS)
    }

    fn build_form(upload: &DocumentUpload) -> Result<Form> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| Error::TranslationRequest(format!("invalid media type: {e}")))?;
        Ok(Form::new().part("file", part))
    }

    /// Make the API request with retry logic
    async fn request_with_retry(
        &self,
        upload: &DocumentUpload,
        target: &Lang,
        preserve_layout: bool,
    ) -> Result<TranslatedDocument> {
        let url = format!("{}/translate-text", self.api_base.trim_end_matches('/'));
        let preserve = if preserve_layout { "true" } else { "false" };

        let mut last_error = None;

        for attempt in 0..self.retry_count {
            debug!(
                "Translation request attempt {}/{} to {}",
                attempt + 1,
                self.retry_count,
                url
            );

            // The multipart body is consumed by send, so rebuild it per attempt
            let form = Self::build_form(upload)?;
            let mut req = self
                .client
                .post(&url)
                .query(&[("target_language", target.as_str()), ("preserve_layout", preserve)])
                .multipart(form);

            if let Some(ref key) = self.api_key {
                req = req.header("Authorization", format!("Bearer {key}"));
            }

            match req.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<TranslateResponse>().await {
                            Ok(parsed) => return Ok(parsed.into_document()),
                            Err(e) => {
                                warn!("Failed to parse response: {}", e);
                                last_error = Some(Error::TranslationInvalidResponse(e.to_string()));
                            }
                        }
                    } else {
                        let status = response.status();
                        let body = response.text().await.unwrap_or_default();
                        warn!("API error: {} - {}", status, body);
                        last_error =
                            Some(Error::TranslationRequest(format!("HTTP {status}: {body}")));
                    }
                }
                Err(e) => {
                    warn!("Request failed: {}", e);
                    if e.is_timeout() {
                        last_error = Some(Error::TranslationTimeout);
                    } else {
                        last_error = Some(Error::TranslationRequest(e.to_string()));
                    }
                }
            }

            if attempt < self.retry_count - 1 {
                tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
            }
        }

        error!("Translation failed after {} attempts", self.retry_count);
        Err(last_error.unwrap_or_else(|| {
            Error::TranslationRequest("no attempts were made".to_string())
        }))
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "Tranzora Remote",
            requires_api_key: false,
            supports_layout: true,
        }
    }

    async fn translate_document(
        &self,
        upload: &DocumentUpload,
        target: &Lang,
        preserve_layout: bool,
    ) -> Result<TranslatedDocument> {
        self.request_with_retry(upload, target, preserve_layout).await
    }
}
