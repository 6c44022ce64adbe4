use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AnalysisError;

/// Mono samples per emitted block.
pub const BLOCK_SIZE: usize = 2048;

/// Streaming frame source: decodes one audio file into fixed-size mono f32
/// blocks, one block per `next_block` call.
///
/// Decoded packets are downmixed to mono and re-chunked into [`BLOCK_SIZE`]
/// blocks; the final block may be shorter. Only the pending re-chunk buffer
/// and one output block are held in memory, regardless of file length.
pub struct FrameSource {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
    sample_rate: u32,
    pending: Vec<f32>,
    block: Vec<f32>,
    exhausted: bool,
}

impl FrameSource {
    pub fn open(path: &Path) -> Result<Self, AnalysisError> {
        let file = File::open(path).map_err(|e| AnalysisError::processing(path, e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AnalysisError::processing(path, format!("probe failed: {e}")))?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::processing(path, "no audio tracks found"))?;

        let track_id = track.id;
        let channels = track.codec_params.channels.map_or(1, |c| c.count());
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AnalysisError::processing(path, "unknown sample rate"))?;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| {
                AnalysisError::processing(path, format!("failed to create decoder: {e}"))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            decoder,
            track_id,
            channels,
            sample_rate,
            pending: Vec::with_capacity(BLOCK_SIZE * 2),
            block: Vec::with_capacity(BLOCK_SIZE),
            exhausted: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Produces the next mono block, or `None` at end of stream.
    pub fn next_block(&mut self) -> Result<Option<&[f32]>, AnalysisError> {
        while self.pending.len() < BLOCK_SIZE && !self.exhausted {
            self.decode_next_packet()?;
        }

        if self.pending.is_empty() {
            return Ok(None);
        }

        let take = self.pending.len().min(BLOCK_SIZE);
        self.block.clear();
        self.block.extend(self.pending.drain(..take));
        Ok(Some(&self.block))
    }

    fn decode_next_packet(&mut self) -> Result<(), AnalysisError> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                self.exhausted = true;
                return Ok(());
            }
            Err(e) => return Err(AnalysisError::processing(&self.path, e)),
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let decoded = match self.decoder.decode(&packet) {
            Ok(d) => d,
            // Skip corrupt packets; the format reader resynchronizes.
            Err(SymphoniaError::DecodeError(_)) => return Ok(()),
            Err(e) => return Err(AnalysisError::processing(&self.path, e)),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            return Ok(());
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        // Downmix to mono
        if self.channels == 1 {
            self.pending.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(self.channels) {
                let mono: f32 = frame_samples.iter().sum::<f32>() / self.channels as f32;
                self.pending.push(mono);
            }
        }

        Ok(())
    }
}
