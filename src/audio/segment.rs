use crate::audio::rms::rms;
use crate::error::AnalysisError;

/// Fraction of a full segment the trailing window must cover to be emitted.
const TAIL_THRESHOLD: f64 = 0.3;

/// Partitions the block stream into fixed-duration windows and summarizes
/// each window as the mean of its per-block RMS values.
///
/// Window boundaries are sample-count based: a window closes on the first
/// block that reaches `samples_per_segment`, so boundaries can drift by up
/// to one block from exact wall-clock multiples of `segment_seconds`.
#[derive(Debug)]
pub struct SegmentAggregator {
    samples_per_segment: usize,
    segments: Vec<f64>,
    samples_in_segment: usize,
    sum_rms: f64,
    frames: u64,
}

impl SegmentAggregator {
    pub fn new(sample_rate: u32, segment_seconds: f64) -> Result<Self, AnalysisError> {
        if segment_seconds <= 0.0 {
            return Err(AnalysisError::InvalidConfiguration { segment_seconds });
        }
        Ok(Self {
            samples_per_segment: (sample_rate as f64 * segment_seconds).round() as usize,
            segments: Vec::new(),
            samples_in_segment: 0,
            sum_rms: 0.0,
            frames: 0,
        })
    }

    pub fn observe(&mut self, block: &[f32]) {
        self.sum_rms += rms(block);
        self.frames += 1;
        self.samples_in_segment += block.len();

        if self.samples_in_segment >= self.samples_per_segment {
            let value = if self.frames == 0 {
                0.0
            } else {
                self.sum_rms / self.frames as f64
            };
            self.segments.push(value);
            self.samples_in_segment = 0;
            self.sum_rms = 0.0;
            self.frames = 0;
        }
    }

    /// Ends the stream and returns the emitted segments in order.
    ///
    /// The trailing partial window is emitted only when it covers at least
    /// 30% of a full segment's sample count (inclusive); smaller tails are
    /// dropped.
    pub fn finish(mut self) -> Vec<f64> {
        if self.frames > 0
            && self.samples_in_segment as f64 >= self.samples_per_segment as f64 * TAIL_THRESHOLD
        {
            self.segments.push(self.sum_rms / self.frames as f64);
        }
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 44100;
    const SEGMENT_SECONDS: f64 = 10.0;
    const SAMPLES_PER_SEGMENT: usize = 441000;

    fn feed_blocks(agg: &mut SegmentAggregator, amplitude: f32, total: usize, block_len: usize) {
        let mut remaining = total;
        while remaining > 0 {
            let len = remaining.min(block_len);
            agg.observe(&vec![amplitude; len]);
            remaining -= len;
        }
    }

    #[test]
    fn rejects_non_positive_segment_seconds() {
        assert!(matches!(
            SegmentAggregator::new(SAMPLE_RATE, 0.0),
            Err(AnalysisError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            SegmentAggregator::new(SAMPLE_RATE, -1.0),
            Err(AnalysisError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn empty_stream_has_no_segments() {
        let agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        assert!(agg.finish().is_empty());
    }

    #[test]
    fn exact_multiple_emits_no_trailing_segment() {
        // 2048 * 215 + 680 == 441000 exactly, so the last block closes the
        // window and finish() must not add a tail.
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        feed_blocks(&mut agg, 0.5, SAMPLES_PER_SEGMENT, 2048);
        let segments = agg.finish();
        assert_eq!(segments.len(), 1);
        assert!((segments[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn tail_at_half_segment_is_emitted() {
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        feed_blocks(&mut agg, 0.25, SAMPLES_PER_SEGMENT / 2, 2048);
        let segments = agg.finish();
        assert_eq!(segments.len(), 1);
        assert!((segments[0] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn tail_below_threshold_is_dropped() {
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        let below = (SAMPLES_PER_SEGMENT as f64 * 0.3) as usize - 2048;
        feed_blocks(&mut agg, 0.25, below, 2048);
        assert!(agg.finish().is_empty());
    }

    #[test]
    fn tail_at_exactly_threshold_is_emitted() {
        // 0.3 * 441000 == 132300, an exact sample count; the comparison is
        // inclusive.
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        feed_blocks(&mut agg, 0.25, 132300, 2048);
        assert_eq!(agg.finish().len(), 1);
    }

    #[test]
    fn silent_stream_yields_zero_valued_segments() {
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        feed_blocks(&mut agg, 0.0, SAMPLES_PER_SEGMENT * 2, 2048);
        let segments = agg.finish();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn window_state_resets_between_segments() {
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        // First window loud, second window quiet.
        feed_blocks(&mut agg, 0.8, SAMPLES_PER_SEGMENT, 2048);
        feed_blocks(&mut agg, 0.1, SAMPLES_PER_SEGMENT, 2048);
        let segments = agg.finish();
        assert_eq!(segments.len(), 2);
        assert!((segments[0] - 0.8).abs() < 1e-9);
        assert!((segments[1] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn boundaries_are_sample_count_based() {
        // The window closes on the block that crosses the boundary; the
        // overshoot is not carried into the next window.
        let mut agg = SegmentAggregator::new(SAMPLE_RATE, SEGMENT_SECONDS).unwrap();
        agg.observe(&vec![0.5; 300_000]);
        agg.observe(&vec![0.5; 300_000]); // closes at 600000 samples
        agg.observe(&vec![0.5; 300_000]); // fresh window, above the tail threshold
        let segments = agg.finish();
        assert_eq!(segments.len(), 2);
        assert!((segments[0] - 0.5).abs() < 1e-9);
    }
}
