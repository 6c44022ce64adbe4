use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the analysis pipeline.
///
/// Duration extraction is deliberately absent here: it degrades to `0.0`
/// and logs a warning instead of failing the analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The path does not exist or is not a regular file.
    #[error("Audio file does not exist or is not a regular file: {path}")]
    InvalidAudioFile {
        /// The path that was passed to [`crate::analyze`].
        path: PathBuf,
    },

    /// A non-positive segment duration was requested.
    #[error("segmentSeconds must be > 0, got {segment_seconds}")]
    InvalidConfiguration { segment_seconds: f64 },

    /// Decoding failed during the main RMS/segment pass. Fatal to the
    /// whole analysis, unlike duration probing.
    #[error("Audio processing failed for {path}: {reason}")]
    AudioProcessingFailure { path: PathBuf, reason: String },
}

impl AnalysisError {
    pub(crate) fn processing(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        AnalysisError::AudioProcessingFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
