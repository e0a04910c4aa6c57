//! Asynchronous extraction orchestration
//!
//! Runs the synchronous engine on tokio's blocking pool so async callers are
//! never stalled, and applies:
//! - A time budget, after which the extraction fails with `Timeout`
//! - Cooperative cancellation through a `CancellationToken`
//!
//! An abandoned extraction never surfaces a partial palette. The blocking task
//! is told to stop through a child token and gives up at its next check, and
//! whatever it returns is dropped.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::image_loader::ImageSource;
use crate::{extract_palette_with_cancel, Config, ExtractionError, ExtractorOptions, PaletteResult, Result};

/// Extraction front end for async callers
///
/// Cheap to clone; concurrent extractions share nothing but the options.
#[derive(Debug, Clone, Default)]
pub struct PaletteExtractor {
    options: ExtractorOptions,
}

impl PaletteExtractor {
    /// Create an extractor, validating the options eagerly
    pub fn new(options: ExtractorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Extract a palette from any image source
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the fallback colors are invalid (checked before
    ///   any work is scheduled)
    /// - `DecodeFailure` if the source cannot be decoded
    /// - `Timeout` if the time budget elapses first
    /// - `TaskFailure` if the worker task panics
    pub async fn extract(&self, source: impl Into<ImageSource>, config: Config) -> Result<PaletteResult> {
        self.extract_with_cancel(source, config, CancellationToken::new()).await
    }

    /// Extract a palette, abandoning the work when `cancel` fires
    ///
    /// Returns `ExtractionError::Cancelled` if the token is cancelled before
    /// the extraction completes.
    pub async fn extract_with_cancel(
        &self,
        source: impl Into<ImageSource>,
        config: Config,
        cancel: CancellationToken,
    ) -> Result<PaletteResult> {
        config.resolve()?;

        let source = source.into();
        let options = self.options.clone();
        let limit = self.options.timeout();
        let start = Instant::now();

        // Fires when the caller cancels, on timeout, or if this future is dropped
        let work = cancel.child_token();
        let worker = work.clone();
        let _abandon = work.drop_guard();

        let task = tokio::task::spawn_blocking(move || {
            let buffer = source.into_pixels()?;
            extract_palette_with_cancel(&buffer, &config, &options, &worker)
        });

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Palette extraction cancelled");
                return Err(ExtractionError::Cancelled);
            }
            outcome = tokio::time::timeout(limit, task) => outcome,
        };

        let result = match outcome {
            Err(_) => {
                warn!(limit_ms = self.options.timeout_ms, "Palette extraction timed out");
                return Err(ExtractionError::Timeout {
                    limit_ms: self.options.timeout_ms,
                });
            }
            Ok(Err(join_error)) => {
                return Err(ExtractionError::TaskFailure {
                    message: format!("Task join error: {}", join_error),
                });
            }
            Ok(Ok(result)) => result?,
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            dominant = %crate::rgb_to_hex(result.dominant),
            "Palette extraction completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelBuffer;

    #[tokio::test]
    async fn test_extract_solid_color() {
        let extractor = PaletteExtractor::default();
        let buffer = PixelBuffer::filled(8, 8, [0, 0, 255, 255]);
        let palette = extractor.extract(buffer, Config::default()).await.unwrap();
        assert_eq!(palette.hex().dominant, "#0000FF");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_eagerly() {
        let extractor = PaletteExtractor::default();
        let source = ImageSource::Encoded(b"not an image".to_vec());
        let result = extractor.extract(source, Config::new("black", "#fff")).await;
        assert!(matches!(result, Err(ExtractionError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_decode_failure_surfaces() {
        let extractor = PaletteExtractor::default();
        let source = ImageSource::Encoded(b"not an image".to_vec());
        let result = extractor.extract(source, Config::default()).await;
        assert!(matches!(result, Err(ExtractionError::DecodeFailure { .. })));
    }

    #[tokio::test]
    async fn test_cancelled_token_abandons_extraction() {
        let extractor = PaletteExtractor::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let buffer = PixelBuffer::filled(8, 8, [0, 0, 255, 255]);
        let result = extractor.extract_with_cancel(buffer, Config::default(), cancel).await;
        assert!(matches!(result, Err(ExtractionError::Cancelled)));
    }

    #[test]
    fn test_new_validates_options() {
        let options = ExtractorOptions { max_colors: 0, ..Default::default() };
        assert!(PaletteExtractor::new(options).is_err());
        assert!(PaletteExtractor::new(ExtractorOptions::default()).is_ok());
    }
}
