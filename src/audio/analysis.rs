use std::path::Path;

use crate::audio::decode::FrameSource;
use crate::audio::duration::read_duration_seconds;
use crate::audio::rms::AverageRms;
use crate::audio::segment::SegmentAggregator;
use crate::error::AnalysisError;
use crate::report::Report;

/// Default segment length in seconds.
pub const DEFAULT_SEGMENT_SECONDS: f64 = 10.0;

/// Analyzes one audio file with the default 10-second segments.
pub fn analyze(path: &Path) -> Result<Report, AnalysisError> {
    analyze_with_segment_seconds(path, DEFAULT_SEGMENT_SECONDS)
}

/// Analyzes one audio file: duration probe, then a single decode pass fed
/// to both the whole-file and the segment aggregator.
///
/// All state is local to this call; analyzing the same file twice yields
/// identical reports.
pub fn analyze_with_segment_seconds(
    path: &Path,
    segment_seconds: f64,
) -> Result<Report, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::InvalidAudioFile {
            path: path.to_path_buf(),
        });
    }

    // Best effort; degrades to 0.0 with a warning instead of failing.
    let duration_seconds = read_duration_seconds(path);

    let mut source = FrameSource::open(path)?;
    let mut average = AverageRms::new();
    let mut segments = SegmentAggregator::new(source.sample_rate(), segment_seconds)?;

    while let Some(block) = source.next_block()? {
        average.observe(block);
        segments.observe(block);
    }

    let report = Report {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        duration_seconds,
        average_rms: average.average(),
        energy_segments: segments.finish(),
    };

    log::info!(
        "Analyzed {}: {:.1}s, avg RMS {:.4}, {} segments",
        report.filename,
        report.duration_seconds,
        report.average_rms,
        report.energy_segments.len()
    );

    Ok(report)
}
