//! OCR provider and the receipt scanner built on it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::providers::error::{ProviderError, bounded};
use crate::receipt::{OcrOutput, ReceiptDraft, ReceiptExtractor};

/// Text recognition over an uploaded image.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Recognizes the text in `image`.
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutput, ProviderError>;
}

/// Treats the upload as already-recognized UTF-8 text.
///
/// Useful for plain-text receipts and for driving the extractor in
/// development without an OCR engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8TextOcr;

#[async_trait]
impl OcrProvider for Utf8TextOcr {
    async fn recognize(&self, image: &[u8]) -> Result<OcrOutput, ProviderError> {
        std::str::from_utf8(image)
            .map(OcrOutput::text)
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Turns uploads into receipt drafts. Never fails.
pub struct ReceiptScanner {
    provider: Option<Arc<dyn OcrProvider>>,
    timeout: Duration,
    rng: Mutex<StdRng>,
}

impl ReceiptScanner {
    /// Scanner over `provider` with an OS-seeded generator.
    #[must_use]
    pub fn new(provider: Arc<dyn OcrProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Scanner that always simulates.
    #[must_use]
    pub fn without_provider() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replaces the generator, for reproducible output.
    #[must_use]
    pub fn with_rng(self, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            ..self
        }
    }

    /// Scans `image`. Provider errors and timeouts degrade to simulation.
    pub async fn scan(&self, image: &[u8], today: NaiveDate) -> ReceiptDraft {
        let output = match &self.provider {
            Some(provider) => match bounded(self.timeout, provider.recognize(image)).await {
                Ok(output) => Some(output),
                Err(err) => {
                    warn!(error = %err, bytes = image.len(), "OCR failed, simulating receipt");
                    None
                }
            },
            None => None,
        };

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let draft = ReceiptExtractor::extract(output.as_ref(), &mut *rng, today);
        debug!(
            merchant = %draft.merchant,
            confidence = draft.confidence,
            simulated = draft.simulated,
            "Receipt scanned"
        );
        draft
    }
}
