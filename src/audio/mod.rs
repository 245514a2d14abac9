//! Audio normalization and segmentation.

pub mod convert;
pub mod segment;

pub use convert::{AudioConverter, ConvertError, FfmpegConverter};
pub use segment::{Segment, SegmentError, Segmenter};

/// Extension of the canonical intermediate format (16 kHz mono 16-bit PCM WAV).
pub const CANONICAL_EXTENSION: &str = "wav";
/// Sample rate the normalizer targets.
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Suffix after the last period, if any. Matching is case-sensitive.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("meeting.mp3"), Some("mp3"));
        assert_eq!(file_extension("standup.notes.wav"), Some("wav"));
        assert_eq!(file_extension("noextension"), None);
        assert_eq!(file_extension("trailing."), None);
        // Case-sensitive on purpose: "MP3" is not in the accepted list.
        assert_eq!(file_extension("upper.MP3"), Some("MP3"));
    }
}
