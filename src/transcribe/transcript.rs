//! Transcript fragments and their ordered aggregation.

use serde::Serialize;

/// The transcribed text for exactly one segment.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptFragment {
    /// Index of the segment this fragment belongs to.
    pub index: usize,
    /// `None` when the segment could not be recognized.
    pub text: Option<String>,
}

impl TranscriptFragment {
    pub fn recognized(index: usize, text: String) -> Self {
        Self {
            index,
            text: Some(text),
        }
    }

    pub fn gap(index: usize) -> Self {
        Self { index, text: None }
    }

    pub fn is_gap(&self) -> bool {
        self.text.is_none()
    }

    /// Line contributed to the transcript; gaps become a visible marker.
    /// Segment numbering is 1-based for the reader.
    pub fn rendered(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => format!("[unrecognized segment {}]", self.index + 1),
        }
    }
}

/// Newline join of fragments in ascending segment index.
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    let mut ordered: Vec<&TranscriptFragment> = fragments.iter().collect();
    ordered.sort_by_key(|fragment| fragment.index);
    ordered
        .iter()
        .map(|fragment| fragment.rendered())
        .collect::<Vec<_>>()
        .join("\n")
}
