//! Broadcast hub carrying score frames from the external engine to
//! subscribers.
//!
//! The hub is gated by the listening state: frames published while idle are
//! dropped, which is how `stop()` halts delivery without tearing down the
//! publishing side.

use super::ScoreFrame;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

pub struct ScoreHub {
    tx: broadcast::Sender<ScoreFrame>,
    active: AtomicBool,
}

impl ScoreHub {
    /// Create a hub buffering up to `capacity` frames per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            active: AtomicBool::new(false),
        }
    }

    /// Publish one frame. Returns true when the hub is listening and the
    /// frame reached at least one subscriber.
    pub fn publish(&self, frame: ScoreFrame) -> bool {
        if !self.active.load(Ordering::Relaxed) {
            log::trace!("hub idle - dropping {} frame", frame.source);
            return false;
        }
        self.tx.send(frame).is_ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScoreFrame> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}
