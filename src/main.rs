//! Marketdeck command center monitor
//!
//! Main application entry point: restores the session, mounts the alert
//! center and the notification bell, and logs their counters as they change.

use std::time::Duration;
use anyhow::Context;
use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, warn, error};

use marketdeck::{
    config::Settings,
    services::ServiceFactory,
    state::ResourceState,
    utils::{helpers::format_relative_time, logging},
    views::{AlertCenter, NotificationCenter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry REACT_APP_BACKEND_URL
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading settings")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", marketdeck::info());
    info!(backend = %settings.backend.base_url, mode = ?settings.data_source.mode, "Configuration loaded");

    let services = ServiceFactory::new(&settings).await?;

    if let Ok(token) = std::env::var("MARKETDECK_TOKEN") {
        services.session.login(token).await?;
    }
    if !services.session.is_authenticated().await {
        warn!("No session token; live requests will fail until MARKETDECK_TOKEN is set");
    }

    let alerts = AlertCenter::new(
        services.source.clone(),
        Duration::from_millis(settings.polling.alerts_interval_ms),
    );
    let notifications = NotificationCenter::new(
        services.source.clone(),
        Duration::from_millis(settings.polling.notifications_interval_ms),
    );

    if let Err(e) = alerts.mount().await {
        error!(error = %e, "Initial alert fetch failed");
    }
    if let Err(e) = notifications.mount().await {
        error!(error = %e, "Initial unread count fetch failed");
    }

    let mut alert_rx = alerts.view().subscribe();
    let mut badge_rx = notifications.badge_view().subscribe();

    info!("Monitoring; press Ctrl-C to stop");

    loop {
        tokio::select! {
            changed = alert_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                report_alerts(&alerts, &mut alert_rx);
            }
            changed = badge_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                report_unread(&notifications, &mut badge_rx);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    alerts.close();
    notifications.close();
    info!("Marketdeck monitor has been shut down.");

    Ok(())
}

fn report_alerts(alerts: &AlertCenter, rx: &mut watch::Receiver<ResourceState>) {
    let state = rx.borrow_and_update().clone();
    if state.loading {
        return;
    }
    if let Some(message) = &state.error {
        warn!(error = %message, "Alert refresh failed; showing last known data");
        return;
    }

    match alerts.badge_count() {
        Ok(count) => info!(unacknowledged = count, generation = state.generation, "Alerts updated"),
        Err(e) => {
            warn!(error = %e, "Could not read alerts");
            return;
        }
    }

    // Most urgent open alert first
    if let Ok(sorted) = alerts.sorted_by_severity() {
        if let Some(top) = sorted.iter().find(|alert| !alert.acknowledged) {
            info!(
                severity = top.severity.as_str(),
                color = top.severity.color(),
                age = %format_relative_time(top.created_at, Utc::now()),
                "{} {}",
                top.severity.icon(),
                top.title
            );
        }
    }
}

fn report_unread(notifications: &NotificationCenter, rx: &mut watch::Receiver<ResourceState>) {
    let state = rx.borrow_and_update().clone();
    if state.loading || state.error.is_some() {
        return;
    }

    match notifications.unread_count() {
        Ok(count) => info!(unread = count, "Notifications updated"),
        Err(e) => warn!(error = %e, "Could not read unread count"),
    }
}
