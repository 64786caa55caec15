//! Classifier-facing types and the score distribution hub.
//!
//! Inference itself lives with the external engine; this module owns the
//! label set, the per-tick score frames it emits, and the channel that
//! carries them into the detection pipeline.

pub mod hub;
pub mod loader;

pub use hub::ScoreHub;
pub use loader::{load, ClassifierModel};

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which classifier produced a score frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SoundLabel {
    Water,
    Door,
}

/// One inference tick worth of confidences, index-aligned to the
/// classifier's label set (index 0 = background, index 1 = target sound).
#[derive(Debug, Clone)]
pub struct ScoreFrame {
    pub source: SoundLabel,
    pub scores: Vec<f32>,
    pub received_at: Instant,
}

impl ScoreFrame {
    pub fn new(source: SoundLabel, scores: Vec<f32>) -> Self {
        Self {
            source,
            scores,
            received_at: Instant::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wire_form() {
        assert_eq!(SoundLabel::Water.to_string(), "water");
        assert_eq!(SoundLabel::Door.to_string(), "door");
        assert_eq!("water".parse::<SoundLabel>().unwrap(), SoundLabel::Water);
        assert_eq!("door".parse::<SoundLabel>().unwrap(), SoundLabel::Door);
        assert!("keys".parse::<SoundLabel>().is_err());
    }

    #[test]
    fn test_label_serde_roundtrip() {
        let json = serde_json::to_string(&SoundLabel::Door).unwrap();
        assert_eq!(json, "\"door\"");
        let label: SoundLabel = serde_json::from_str("\"water\"").unwrap();
        assert_eq!(label, SoundLabel::Water);
    }

    #[test]
    fn test_frame_accessors() {
        let frame = ScoreFrame::new(SoundLabel::Water, vec![0.2, 0.8]);
        assert_eq!(frame.len(), 2);
        assert!(!frame.is_empty());

        let empty = ScoreFrame::new(SoundLabel::Door, vec![]);
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }
}
