pub mod pipeline;

pub use pipeline::{DetectionEvent, DetectionPipeline, DETECTION_THRESHOLD, TARGET_INDEX};
