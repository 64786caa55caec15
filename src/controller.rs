//! Listening state machine and the hub → pipeline → gateway consumer task.

use crate::classifier::{ClassifierModel, ScoreFrame, ScoreHub, SoundLabel};
use crate::detection::DetectionPipeline;
use crate::error::{Result, SentryError};
use crate::notify::{NotificationGateway, NotificationRequest};
use crate::status::StatusUpdater;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningState {
    Idle,
    Listening,
}

/// Owns the listening state and the consumer task that drives frames from
/// the hub through the pipeline into the gateway.
pub struct ListeningController {
    state: ListeningState,
    water: Option<ClassifierModel>,
    door: Option<ClassifierModel>,
    hub: Arc<ScoreHub>,
    pipeline: Arc<DetectionPipeline>,
    gateway: Arc<dyn NotificationGateway>,
    status: Arc<dyn StatusUpdater>,
    consumer: Option<(JoinHandle<()>, CancellationToken)>,
}

impl ListeningController {
    pub fn new(
        hub: Arc<ScoreHub>,
        pipeline: Arc<DetectionPipeline>,
        gateway: Arc<dyn NotificationGateway>,
        status: Arc<dyn StatusUpdater>,
    ) -> Self {
        Self {
            state: ListeningState::Idle,
            water: None,
            door: None,
            hub,
            pipeline,
            gateway,
            status,
            consumer: None,
        }
    }

    /// Attach a loaded classifier. Both must be attached before `start`.
    pub fn attach(&mut self, source: SoundLabel, model: ClassifierModel) {
        log::info!(
            "🔌 {} classifier attached (target label '{}')",
            source,
            model.target_label()
        );
        match source {
            SoundLabel::Water => self.water = Some(model),
            SoundLabel::Door => self.door = Some(model),
        }
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    /// Begin consuming score frames. Rejected until both classifiers are
    /// attached; calling again while listening is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.water.is_none() || self.door.is_none() {
            return Err(SentryError::Classifier(
                "classifiers not loaded yet - cannot start listening".to_string(),
            ));
        }
        if self.state == ListeningState::Listening {
            log::debug!("start() while already listening - ignoring");
            return Ok(());
        }

        // Subscribe before opening the gate so no frame slips past.
        let mut frames = BroadcastStream::new(self.hub.subscribe());
        self.hub.set_active(true);

        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let gateway = Arc::clone(&self.gateway);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    next = frames.next() => match next {
                        Some(Ok(frame)) => process_frame(&pipeline, gateway.as_ref(), frame).await,
                        Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                            log::warn!("⚠️ Score consumer lagged - skipped {} frames", skipped);
                        }
                        None => break,
                    },
                }
            }
            log::debug!("Score consumer stopped");
        });

        self.consumer = Some((task, cancel));
        self.state = ListeningState::Listening;
        self.status.set_status("Listening for sounds... (30% threshold)");
        Ok(())
    }

    /// Halt frame delivery and return to idle. Frames the consumer already
    /// dequeued still complete; a stop while idle is a no-op.
    pub async fn stop(&mut self) {
        if self.state == ListeningState::Idle {
            log::debug!("stop() while idle - ignoring");
            return;
        }

        self.hub.set_active(false);
        if let Some((task, cancel)) = self.consumer.take() {
            cancel.cancel();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Score consumer task failed: {}", e);
                }
            }
        }

        self.state = ListeningState::Idle;
        self.status.set_status("Listening stopped");
    }
}

async fn process_frame(
    pipeline: &DetectionPipeline,
    gateway: &dyn NotificationGateway,
    frame: ScoreFrame,
) {
    match pipeline.evaluate(&frame.scores, frame.source) {
        Ok(Some(event)) => {
            let request = NotificationRequest::reminder(event.title(), event.message());
            match gateway.show(request).await {
                Ok(outcome) => {
                    log::debug!("Notification outcome for {}: {:?}", event.source, outcome)
                }
                Err(e) => log::error!("Failed to raise {} notification: {}", event.source, e),
            }
        }
        Ok(None) => {}
        Err(e) => log::warn!("Dropping malformed frame: {}", e),
    }
}
