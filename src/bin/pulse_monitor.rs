use anyhow::Result;
use pulse::application::{init_logging_with_level, MonitorApp};
use pulse::MonitorConfig;
use pulsewatch::bin_common::{load_config_from_env, ConfigType};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Monitor);
    let config = MonitorConfig::load(&config_path)?;

    // Initialize logging with configured level
    init_logging_with_level(&config.log_level);
    config.log();

    let update_interval_ms = config.update_interval_ms;
    let mut app = MonitorApp::new(config)?;
    app.shutdown.spawn_signal_handler();
    let notifier = app.spawn_notification_logger();

    print_banner("Pulse Monitor", update_interval_ms);

    if !app.engine.request_notification_permission() {
        warn!("Notification permission denied, alerts will only be recorded");
    }

    app.engine.start().await;

    while app.is_running() {
        app.heartbeat().await;
        app.shutdown.interruptible_sleep(Duration::from_secs(1)).await;
    }

    app.engine.stop();

    let recent = app.store.recent(5);
    if !recent.is_empty() {
        info!("Last {} alerts:", recent.len());
        for event in &recent {
            info!("  [{}] {}", event.timestamp.format("%H:%M:%S"), event.message);
        }
    }

    if let Some(handle) = notifier {
        handle.abort();
    }

    print_shutdown("Pulse monitor");
    Ok(())
}

fn print_banner(name: &str, interval_ms: u64) {
    info!("");
    info!("========================================");
    info!("Starting {}", name);
    info!("Update interval: {}ms", interval_ms);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown(name: &str) {
    info!("");
    info!("========================================");
    info!("{} stopped gracefully", name);
    info!("========================================");
}
