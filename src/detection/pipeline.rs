//! Detection decision pipeline.
//!
//! Consumes one score frame per inference tick, forwards the confidence to
//! the status surface, and decides whether the target sound crossed the
//! detection threshold.

use crate::classifier::SoundLabel;
use crate::error::{Result, SentryError};
use crate::status::StatusUpdater;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Confidence above which a label counts as detected.
pub const DETECTION_THRESHOLD: f32 = 0.3;

/// Index of the target sound in every classifier's label set.
pub const TARGET_INDEX: usize = 1;

/// Notification title and message stem per source.
static MESSAGES: Lazy<HashMap<SoundLabel, (&'static str, &'static str)>> = Lazy::new(|| {
    HashMap::from([
        (SoundLabel::Water, ("Water Reminder", "Water detected")),
        (SoundLabel::Door, ("Keys Reminder", "Door sound detected")),
    ])
});

/// A score frame whose arg-max crossed the threshold on the target label.
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    pub source: SoundLabel,
    pub score: f32,
    pub argmax_index: usize,
    pub timestamp: Instant,
}

impl DetectionEvent {
    pub fn title(&self) -> &'static str {
        MESSAGES[&self.source].0
    }

    pub fn message(&self) -> String {
        format!(
            "{} ({:.1}% confident)",
            MESSAGES[&self.source].1,
            self.score * 100.0
        )
    }
}

pub struct DetectionPipeline {
    status: Arc<dyn StatusUpdater>,
}

impl DetectionPipeline {
    pub fn new(status: Arc<dyn StatusUpdater>) -> Self {
        Self { status }
    }

    /// Evaluate one frame. The max confidence always reaches the status
    /// surface; only frames whose arg-max is the target label above the
    /// threshold produce an event.
    pub fn evaluate(&self, scores: &[f32], source: SoundLabel) -> Result<Option<DetectionEvent>> {
        if scores.is_empty() {
            return Err(SentryError::InvalidInput(format!(
                "empty score vector from {} classifier",
                source
            )));
        }

        let (argmax_index, max_score) = argmax(scores);
        self.status.update_confidence(max_score);
        log::debug!(
            "🎯 {} scores - max {:.2} at index {}",
            source,
            max_score,
            argmax_index
        );

        if max_score > DETECTION_THRESHOLD && argmax_index == TARGET_INDEX {
            log::info!("🔔 {} sound detected ({:.1}% confident)", source, max_score * 100.0);
            Ok(Some(DetectionEvent {
                source,
                score: max_score,
                argmax_index,
                timestamp: Instant::now(),
            }))
        } else {
            Ok(None)
        }
    }
}

/// First index attaining the maximum value.
fn argmax(scores: &[f32]) -> (usize, f32) {
    let mut best_index = 0;
    let mut best = scores[0];
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > best {
            best = score;
            best_index = index;
        }
    }
    (best_index, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RecordingStatus;

    fn pipeline() -> (DetectionPipeline, Arc<RecordingStatus>) {
        let status = Arc::new(RecordingStatus::new());
        (DetectionPipeline::new(status.clone()), status)
    }

    #[test]
    fn test_water_detection_event() {
        let (pipeline, _status) = pipeline();
        let event = pipeline
            .evaluate(&[0.65, 0.9], SoundLabel::Water)
            .unwrap()
            .expect("score above threshold on the target index");

        assert_eq!(event.source, SoundLabel::Water);
        assert_eq!(event.argmax_index, 1);
        assert_eq!(event.score, 0.9);
        assert_eq!(event.title(), "Water Reminder");
        assert_eq!(event.message(), "Water detected (90.0% confident)");
    }

    #[test]
    fn test_door_detection_event() {
        let (pipeline, _status) = pipeline();
        let event = pipeline
            .evaluate(&[0.2, 0.52], SoundLabel::Door)
            .unwrap()
            .unwrap();

        assert_eq!(event.title(), "Keys Reminder");
        assert_eq!(event.message(), "Door sound detected (52.0% confident)");
    }

    #[test]
    fn test_background_argmax_is_silent() {
        let (pipeline, status) = pipeline();
        let result = pipeline.evaluate(&[0.9, 0.1], SoundLabel::Door).unwrap();

        assert!(result.is_none());
        // The confidence still reaches the indicator
        assert_eq!(status.confidences(), vec![0.9]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let (pipeline, _status) = pipeline();
        assert!(pipeline.evaluate(&[0.1, 0.3], SoundLabel::Water).unwrap().is_none());
        assert!(pipeline
            .evaluate(&[0.1, 0.30001], SoundLabel::Water)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_ties_resolve_to_first_index() {
        let (pipeline, _status) = pipeline();
        // Equal scores: arg-max lands on index 0, not the target
        assert!(pipeline.evaluate(&[0.5, 0.5], SoundLabel::Water).unwrap().is_none());
    }

    #[test]
    fn test_non_target_argmax_above_threshold() {
        let (pipeline, _status) = pipeline();
        assert!(pipeline
            .evaluate(&[0.1, 0.2, 0.9], SoundLabel::Door)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_subthreshold_still_updates_status() {
        let (pipeline, status) = pipeline();
        assert!(pipeline.evaluate(&[0.2, 0.25], SoundLabel::Water).unwrap().is_none());
        assert_eq!(status.confidences(), vec![0.25]);
    }

    #[test]
    fn test_empty_scores_fail_fast() {
        let (pipeline, status) = pipeline();
        let err = pipeline.evaluate(&[], SoundLabel::Water);

        assert!(matches!(err, Err(SentryError::InvalidInput(_))));
        assert!(status.confidences().is_empty());
    }

    #[test]
    fn test_every_tick_emits_fresh_event() {
        // No deduplication: identical qualifying frames each produce an event
        let (pipeline, _status) = pipeline();
        for _ in 0..3 {
            assert!(pipeline
                .evaluate(&[0.1, 0.8], SoundLabel::Water)
                .unwrap()
                .is_some());
        }
    }
}
