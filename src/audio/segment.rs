//! Duration-based audio segmentation.
//!
//! Cuts the canonical WAV at fixed wall-clock boundaries and re-encodes
//! each range as a self-contained WAV file. Slicing raw encoded bytes can
//! land mid-frame and produce an undecodable segment, so every segment
//! written here carries its own header.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Failed to read or write WAV: {0}")]
    Wav(#[from] hound::Error),
    #[error("IO error during segmentation: {0}")]
    Io(#[from] std::io::Error),
    #[error("Audio contains no samples")]
    EmptyAudio,
    #[error("Unsupported WAV encoding: {0}")]
    UnsupportedEncoding(String),
}

/// One duration-aligned slice of the normalized audio, written out as a
/// self-contained WAV file. Segments partition the source contiguously,
/// no gap and no overlap.
#[derive(Debug, Clone)]
pub struct Segment {
    /// 0-based position in the source audio.
    pub index: usize,
    pub path: PathBuf,
    pub start_secs: f64,
    pub duration_secs: f64,
}

pub struct Segmenter {
    max_segment_secs: u32,
}

impl Segmenter {
    pub fn new(max_segment_secs: u32) -> Self {
        Self { max_segment_secs }
    }

    /// Split `input` into `out_dir/segment_NNN.wav` files.
    ///
    /// Produces at least one segment for any non-empty input; the final
    /// segment may be shorter than the threshold but is never dropped.
    pub fn split_wav(&self, input: &Path, out_dir: &Path) -> Result<Vec<Segment>, SegmentError> {
        let mut reader = hound::WavReader::open(input)?;
        let spec = reader.spec();

        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample > 16 {
            return Err(SegmentError::UnsupportedEncoding(format!(
                "{:?}, {} bits per sample",
                spec.sample_format, spec.bits_per_sample
            )));
        }

        let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
        let channels = spec.channels as usize;
        let total_frames = samples.len() / channels;
        if total_frames == 0 {
            return Err(SegmentError::EmptyAudio);
        }

        let frames_per_segment = spec.sample_rate as usize * self.max_segment_secs as usize;
        let bounds = segment_bounds(total_frames, frames_per_segment);

        std::fs::create_dir_all(out_dir)?;

        let mut segments = Vec::with_capacity(bounds.len());
        for (index, &(start_frame, frame_count)) in bounds.iter().enumerate() {
            let path = out_dir.join(format!("segment_{:03}.wav", index));
            let mut writer = hound::WavWriter::create(&path, spec)?;
            let sample_range =
                start_frame * channels..(start_frame + frame_count) * channels;
            for &sample in &samples[sample_range] {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;

            segments.push(Segment {
                index,
                path,
                start_secs: start_frame as f64 / spec.sample_rate as f64,
                duration_secs: frame_count as f64 / spec.sample_rate as f64,
            });
        }

        info!(
            "Split {:?} ({:.1}s) into {} segments of up to {}s",
            input,
            total_frames as f64 / spec.sample_rate as f64,
            segments.len(),
            self.max_segment_secs
        );

        Ok(segments)
    }
}

/// Contiguous `(start, length)` frame ranges covering `0..total_frames`.
fn segment_bounds(total_frames: usize, frames_per_segment: usize) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut start = 0;
    while start < total_frames {
        let length = frames_per_segment.min(total_frames - start);
        bounds.push((start, length));
        start += length;
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_test_wav(path: &Path, sample_rate: u32, duration_secs: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(sample_rate * duration_secs) {
            writer.write_sample((i % 100) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_segment_bounds_ceiling_count() {
        // 5 full segments worth plus a remainder -> 6 segments.
        let bounds = segment_bounds(5 * 1000 + 1, 1000);
        assert_eq!(bounds.len(), 6);
        assert_eq!(bounds[5], (5000, 1));

        // Exact multiple -> no extra segment.
        let bounds = segment_bounds(3000, 1000);
        assert_eq!(bounds.len(), 3);
    }

    #[test]
    fn test_segment_bounds_partition_without_gaps() {
        let bounds = segment_bounds(2500, 1000);
        let mut expected_start = 0;
        for (start, length) in &bounds {
            assert_eq!(*start, expected_start);
            expected_start = start + length;
        }
        assert_eq!(expected_start, 2500);
    }

    #[test]
    fn test_five_minutes_at_two_minute_threshold() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.wav");
        // 1 kHz keeps the fixture small; the segmenter reads the rate
        // from the file itself.
        write_test_wav(&input, 1000, 300);

        let segments = Segmenter::new(120)
            .split_wav(&input, &dir.path().join("segments"))
            .unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].duration_secs, 120.0);
        assert_eq!(segments[1].duration_secs, 120.0);
        assert_eq!(segments[2].duration_secs, 60.0);
        assert_eq!(segments[0].start_secs, 0.0);
        assert_eq!(segments[1].start_secs, 120.0);
        assert_eq!(segments[2].start_secs, 240.0);
    }

    #[test]
    fn test_segments_are_decodable_wav_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.wav");
        write_test_wav(&input, 1000, 150);

        let segments = Segmenter::new(120)
            .split_wav(&input, &dir.path().join("segments"))
            .unwrap();

        let mut total_frames = 0u32;
        for segment in &segments {
            let reader = hound::WavReader::open(&segment.path).unwrap();
            assert_eq!(reader.spec().sample_rate, 1000);
            total_frames += reader.duration();
        }
        assert_eq!(total_frames, 150 * 1000);
    }

    #[test]
    fn test_short_input_yields_single_segment() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.wav");
        write_test_wav(&input, 1000, 10);

        let segments = Segmenter::new(120)
            .split_wav(&input, &dir.path().join("segments"))
            .unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].duration_secs, 10.0);
    }

    #[test]
    fn test_empty_audio_is_an_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.wav");
        write_test_wav(&input, 1000, 0);

        let err = Segmenter::new(120)
            .split_wav(&input, &dir.path().join("segments"))
            .unwrap_err();
        assert!(matches!(err, SegmentError::EmptyAudio));
    }
}
