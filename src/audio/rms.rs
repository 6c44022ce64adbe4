/// Root-mean-square energy of one block of normalized samples.
///
/// Accumulates in f64 and defines `rms(&[]) == 0.0`.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// Running mean of per-block RMS values over the whole stream.
///
/// Counts one unit per observed block, not per sample. This is a mean of
/// block-level RMS values, not a single RMS over the full sample set.
#[derive(Debug, Default)]
pub struct AverageRms {
    sum_rms: f64,
    frames: u64,
}

impl AverageRms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, block: &[f32]) {
        self.sum_rms += rms(block);
        self.frames += 1;
    }

    pub fn average(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.sum_rms / self.frames as f64
        }
    }
}
