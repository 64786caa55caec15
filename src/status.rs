//! Listening status and confidence presentation.
//!
//! The pipeline forwards every max score here regardless of the threshold
//! outcome, so the indicator always tracks what the classifier is hearing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub trait StatusUpdater: Send + Sync {
    /// Mirror the latest max confidence, independent of detection outcome.
    fn update_confidence(&self, confidence: f32);

    /// Reflect a listening-state change with its user-facing status line.
    fn set_status(&self, text: &str);
}

/// Console indicator: renders the confidence bar into the log stream.
pub struct ConsoleStatus {
    // f32 stored as raw bits so updates stay lock-free
    last_confidence: AtomicU32,
}

impl ConsoleStatus {
    pub fn new() -> Self {
        Self {
            last_confidence: AtomicU32::new(0),
        }
    }

    pub fn last_confidence(&self) -> f32 {
        f32::from_bits(self.last_confidence.load(Ordering::Relaxed))
    }

    fn bar(confidence: f32) -> String {
        const WIDTH: usize = 20;
        let filled = (confidence.clamp(0.0, 1.0) * WIDTH as f32).round() as usize;
        let mut bar = String::with_capacity(WIDTH * 3);
        for i in 0..WIDTH {
            bar.push(if i < filled { '█' } else { '░' });
        }
        bar
    }
}

impl Default for ConsoleStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusUpdater for ConsoleStatus {
    fn update_confidence(&self, confidence: f32) {
        self.last_confidence
            .store(confidence.to_bits(), Ordering::Relaxed);
        log::debug!(
            "📊 [{}] {}%",
            Self::bar(confidence),
            (confidence * 100.0).round() as i32
        );
    }

    fn set_status(&self, text: &str) {
        log::info!("ℹ️  {}", text);
    }
}

/// Recording double for exercising the pipeline without a console.
#[derive(Default)]
pub struct RecordingStatus {
    confidences: Mutex<Vec<f32>>,
    statuses: Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confidences(&self) -> Vec<f32> {
        self.confidences.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

impl StatusUpdater for RecordingStatus {
    fn update_confidence(&self, confidence: f32) {
        self.confidences.lock().unwrap().push(confidence);
    }

    fn set_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_tracks_last_confidence() {
        let status = ConsoleStatus::new();
        assert_eq!(status.last_confidence(), 0.0);

        status.update_confidence(0.42);
        assert_eq!(status.last_confidence(), 0.42);

        status.update_confidence(0.9);
        assert_eq!(status.last_confidence(), 0.9);
    }

    #[test]
    fn test_bar_rendering() {
        assert_eq!(ConsoleStatus::bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(ConsoleStatus::bar(0.5).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(ConsoleStatus::bar(1.0).chars().filter(|c| *c == '█').count(), 20);
        // Out-of-range values clamp instead of overflowing the bar
        assert_eq!(ConsoleStatus::bar(1.7).chars().filter(|c| *c == '█').count(), 20);
    }

    #[test]
    fn test_recording_status() {
        let status = RecordingStatus::new();
        status.update_confidence(0.3);
        status.update_confidence(0.6);
        status.set_status("Listening stopped");

        assert_eq!(status.confidences(), vec![0.3, 0.6]);
        assert_eq!(status.statuses(), vec!["Listening stopped"]);
    }
}
