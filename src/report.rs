use serde::Serialize;

/// The analysis result returned to the caller.
///
/// Serialized with camelCase field names: `filename`, `durationSeconds`,
/// `averageRms`, `energySegments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Display name of the analyzed file. The HTTP layer replaces this with
    /// the original upload name so transient paths never leak.
    pub filename: String,
    /// Total duration in seconds; `0.0` when it could not be determined.
    pub duration_seconds: f64,
    /// Arithmetic mean of per-block RMS values across the whole file.
    pub average_rms: f64,
    /// One RMS value per fixed-duration segment, in chronological order.
    pub energy_segments: Vec<f64>,
}
