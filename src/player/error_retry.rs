use tracing::info;

use crate::utils::errors::PlaybackError;

/// Holds the single error currently shown and counts user-initiated retries.
#[derive(Debug, Default)]
pub struct ErrorRetryManager {
    /// Current error, if any
    error: Option<PlaybackError>,
    /// Number of retry attempts for the current source
    retry_count: u32,
}

impl ErrorRetryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        self.error.as_ref()
    }

    /// Check if there's an active error
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Replaces whatever error was shown; there is never more than one.
    pub fn show_error(&mut self, error: PlaybackError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether the "Try Again" affordance applies to the current error.
    pub fn can_retry(&self) -> bool {
        self.error.as_ref().is_some_and(PlaybackError::is_retryable)
    }

    /// Consumes the current error for a retry. Returns false when there is
    /// nothing retryable.
    pub fn begin_retry(&mut self) -> bool {
        if !self.can_retry() {
            return false;
        }
        self.retry_count += 1;
        self.error = None;
        info!("Retrying playback, attempt #{}", self.retry_count);
        true
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Reset the retry count (called when a load succeeds)
    pub fn reset(&mut self) {
        self.retry_count = 0;
    }
}
