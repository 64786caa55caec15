use anyhow::Context;
use clap::Parser;
use sound_sentry_rs::{
    classifier::{self, ScoreHub, SoundLabel},
    config::load_config,
    controller::ListeningController,
    detection::DetectionPipeline,
    notify::{DesktopGateway, NotificationGateway, NotificationRequest, PermissionState},
    push::PushWorker,
    server::{self, AppState},
    status::{ConsoleStatus, StatusUpdater},
};
use std::sync::Arc;

/// Sound detection notifier: watches water/door classifier scores and
/// raises desktop reminders.
#[derive(Parser, Debug)]
#[command(name = "sound-sentry", version, about)]
struct Args {
    /// Override the HTTP port (default 3000, or SENTRY_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Show a single test notification and exit.
    #[arg(long)]
    test_notification: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    log::info!("🚀 Initializing sound-sentry");
    let mut config = load_config().context("configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let gateway: Arc<dyn NotificationGateway> = Arc::new(DesktopGateway::new());
    let permission = gateway
        .request_permission()
        .await
        .context("notification permission probe")?;

    if args.test_notification {
        return run_test_notification(gateway.as_ref(), permission).await;
    }

    if permission != PermissionState::Granted {
        log::warn!("⚠️ Please enable notifications to receive alerts");
    }

    // Both classifiers load up front; either failure leaves the system
    // permanently unable to listen, so abort with a visible message.
    let client = reqwest::Client::new();
    let loaded = tokio::try_join!(
        classifier::load(&client, &config.water_model_url),
        classifier::load(&client, &config.door_model_url)
    );
    let (water, door) = match loaded {
        Ok(models) => models,
        Err(e) => {
            log::error!("❌ Error loading models: {}. Please restart.", e);
            return Err(e).context("loading classifier models");
        }
    };

    let status: Arc<dyn StatusUpdater> = Arc::new(ConsoleStatus::new());
    let hub = Arc::new(ScoreHub::new(32));
    let pipeline = Arc::new(DetectionPipeline::new(Arc::clone(&status)));

    let mut controller = ListeningController::new(
        Arc::clone(&hub),
        pipeline,
        Arc::clone(&gateway),
        Arc::clone(&status),
    );
    controller.attach(SoundLabel::Water, water);
    controller.attach(SoundLabel::Door, door);
    controller
        .start()
        .context("starting the listening controller")?;

    let push = Arc::new(PushWorker::new(Arc::clone(&gateway)));
    let state = AppState {
        hub: Arc::clone(&hub),
        push,
    };
    let port = config.port;
    let mut server = tokio::spawn(server::serve(config, state));

    println!("🎧 Listening for water and door sounds...");
    println!("   Demo page and ingest endpoints on port {}", port);
    println!("   Press Ctrl+C to exit");

    tokio::select! {
        result = &mut server => {
            controller.stop().await;
            match result {
                Ok(Ok(())) => log::info!("Server stopped"),
                Ok(Err(e)) => return Err(e).context("server"),
                Err(e) => return Err(e).context("server task"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received Ctrl+C, shutting down...");
            controller.stop().await;
            println!("\n👋 Goodbye!");
        }
    }

    Ok(())
}

async fn run_test_notification(
    gateway: &dyn NotificationGateway,
    permission: PermissionState,
) -> anyhow::Result<()> {
    if permission != PermissionState::Granted {
        log::warn!("⚠️ Please enable notifications first!");
        return Ok(());
    }

    let request = NotificationRequest::reminder("Test Notification", "This is a test notification.");
    let outcome = gateway
        .show(request)
        .await
        .context("showing the test notification")?;
    log::info!("Test notification outcome: {:?}", outcome);

    // Give the detached display task a moment before the process exits.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    Ok(())
}
