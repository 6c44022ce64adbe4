use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Best-effort total duration in seconds, from an independent probe pass.
///
/// Returns `0.0` and logs a warning when the file cannot be probed or the
/// track does not report a positive frame count and sample rate. Never
/// fails the overall analysis.
pub fn read_duration_seconds(path: &Path) -> f64 {
    match probe_duration(path) {
        Ok(Some(duration)) => duration,
        Ok(None) => {
            log::warn!("Unable to read duration for {}", path.display());
            0.0
        }
        Err(e) => {
            log::warn!("Failed to read duration for {}: {e}", path.display());
            0.0
        }
    }
}

fn probe_duration(path: &Path) -> anyhow::Result<Option<f64>> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL);

    let duration = track.and_then(|t| {
        let frames = t.codec_params.n_frames?;
        let sample_rate = t.codec_params.sample_rate?;
        if frames > 0 && sample_rate > 0 {
            Some(frames as f64 / sample_rate as f64)
        } else {
            None
        }
    });

    Ok(duration)
}
