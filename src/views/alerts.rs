//! Command center alert view
//!
//! Four tabs (active alerts, rules, incidents, dashboard summary) over one
//! resource view that polls on a fixed interval. Acknowledging an alert is an
//! optimistic command against the active list.

use std::cmp::Reverse;
use std::time::Duration;
use reqwest::Method;
use tracing::info;
use crate::models::{Alert, AlertDashboard, AlertRule, Incident};
use crate::services::source::DataSource;
use crate::state::optimistic::{update_where, MutationOutcome, OptimisticCommand};
use crate::state::resource::{FetchOutcome, ResourceSpec, ResourceState, ResourceView};
use crate::state::tabs::{Tab, TabSelector};
use crate::utils::errors::Result;
use crate::utils::helpers::resource_path;
use crate::views::banner::BannerSlot;

const ALERTS_PREFIX: &str = "/api/alerts";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlertTab {
    #[default]
    Active,
    Rules,
    Incidents,
    Dashboard,
}

impl Tab for AlertTab {
    fn all() -> &'static [Self] {
        &[AlertTab::Active, AlertTab::Rules, AlertTab::Incidents, AlertTab::Dashboard]
    }

    fn key(&self) -> &'static str {
        match self {
            AlertTab::Active => "alerts",
            AlertTab::Rules => "rules",
            AlertTab::Incidents => "incidents",
            AlertTab::Dashboard => "dashboard",
        }
    }

    fn resources(&self) -> Vec<ResourceSpec> {
        match self {
            AlertTab::Active => vec![ResourceSpec::enveloped("alerts", "/api/alerts/active", "alerts")],
            AlertTab::Rules => vec![ResourceSpec::enveloped("rules", "/api/alerts/rules", "rules")],
            AlertTab::Incidents => vec![ResourceSpec::enveloped("incidents", "/api/alerts/incidents", "incidents")],
            AlertTab::Dashboard => vec![ResourceSpec::raw("dashboard", "/api/alerts/dashboard")],
        }
    }
}

/// Resources fetched and polled while `tab` is open
///
/// The active list is always part of the batch; the badge counts from it.
fn batch_for(tab: AlertTab) -> Vec<ResourceSpec> {
    let mut specs = AlertTab::Active.resources();
    if tab != AlertTab::Active {
        specs.extend(tab.resources());
    }
    specs
}

/// Alert center screen state
#[derive(Debug)]
pub struct AlertCenter {
    view: ResourceView,
    tabs: TabSelector<AlertTab>,
    banner: BannerSlot,
    poll_interval: Duration,
}

impl AlertCenter {
    pub fn new(source: DataSource, poll_interval: Duration) -> Self {
        Self {
            view: ResourceView::new("alerts", source, Vec::new()),
            tabs: TabSelector::new(),
            banner: BannerSlot::default(),
            poll_interval,
        }
    }

    /// Start polling and load the default tab
    pub async fn mount(&self) -> Result<()> {
        self.view.start_polling(self.poll_interval);

        let tab = self.tabs.current();
        self.view
            .set_dependency(tab.key(), batch_for(tab))
            .await
            .map(|_| ())
            .map_err(|e| {
                self.banner.from_error(&e);
                e
            })
    }

    /// Switch tabs; fetches the new tab's data when the selection changed
    pub async fn select_tab(&mut self, tab: AlertTab) -> Result<bool> {
        if !self.tabs.select(tab) {
            return Ok(false);
        }

        info!(tab = tab.key(), "Alert tab selected");
        self.view.set_dependency(tab.key(), batch_for(tab)).await.map_err(|e| {
            self.banner.from_error(&e);
            e
        })
    }

    pub fn current_tab(&self) -> AlertTab {
        self.tabs.current()
    }

    /// Refresh the current tab now
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        self.view.refresh().await
    }

    pub fn state(&self) -> ResourceState {
        self.view.state()
    }

    pub fn view(&self) -> &ResourceView {
        &self.view
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    pub fn alerts(&self) -> Result<Vec<Alert>> {
        self.view.state().items("alerts")
    }

    pub fn rules(&self) -> Result<Vec<AlertRule>> {
        self.view.state().items("rules")
    }

    pub fn incidents(&self) -> Result<Vec<Incident>> {
        self.view.state().items("incidents")
    }

    pub fn dashboard(&self) -> Result<Option<AlertDashboard>> {
        self.view.state().get("dashboard")
    }

    /// Number of active alerts still waiting for acknowledgement
    pub fn badge_count(&self) -> Result<usize> {
        Ok(self.alerts()?.iter().filter(|alert| !alert.acknowledged).count())
    }

    /// Unacknowledged first, then most severe, then newest
    pub fn sorted_by_severity(&self) -> Result<Vec<Alert>> {
        let mut alerts = self.alerts()?;
        alerts.sort_by_key(|alert| (alert.acknowledged, alert.severity.rank(), Reverse(alert.created_at)));
        Ok(alerts)
    }

    /// Mark one alert acknowledged, reverting if the backend refuses
    pub async fn acknowledge(&self, alert_id: &str) -> Result<MutationOutcome> {
        let path = resource_path(ALERTS_PREFIX, alert_id, Some("acknowledge"));
        let target = format!("alert {}", alert_id);
        let source = self.view.source();

        let result = OptimisticCommand::<Alert>::new(&self.view, "alerts", "acknowledge", &target)
            .run(
                |alerts| update_where(alerts, |alert| alert.id == alert_id, |alert| alert.acknowledged = true),
                || source.send(Method::POST, &path, None),
            )
            .await;

        match &result {
            Ok(_) => self.banner.success("Alert acknowledged"),
            Err(e) => self.banner.from_error(e),
        }
        result
    }

    /// Unmount: stop polling and ignore anything still in flight
    pub fn close(&self) {
        self.view.close();
    }
}

impl Drop for AlertCenter {
    fn drop(&mut self) {
        self.view.close();
    }
}
