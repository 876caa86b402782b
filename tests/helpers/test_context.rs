//! Test context for integration tests
//!
//! Builds settings pointing at a fresh mock backend, a session persisted in
//! a temporary directory and the service factory on top of them.

use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

use marketdeck::{
    config::{DataSourceMode, Settings},
    services::{DataSource, ServiceFactory},
};

use super::{BackendMockServer, TEST_TOKEN};

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("marketdeck=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Test configuration options
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub signed_in: bool,
    pub setup_default_mocks: bool,
    pub max_attempts: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            signed_in: true,
            setup_default_mocks: true,
            max_attempts: 3,
        }
    }
}

/// Main test context
pub struct TestContext {
    pub backend: BackendMockServer,
    pub settings: Settings,
    pub services: ServiceFactory,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Signed-in context with the default mocks mounted
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::new_with_config(TestConfig::default()).await
    }

    /// Signed-in context with no mocks mounted
    pub async fn bare() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::new_with_config(TestConfig {
            setup_default_mocks: false,
            ..Default::default()
        })
        .await
    }

    pub async fn new_with_config(config: TestConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        init_test_logging();

        let backend = BackendMockServer::new().await;
        if config.setup_default_mocks {
            backend.setup_default_mocks().await;
        }

        let temp_dir = tempfile::tempdir()?;
        let settings = Self::create_test_settings(&backend, &temp_dir, config.max_attempts);
        settings.validate()?;

        let services = ServiceFactory::new(&settings).await?;
        if config.signed_in {
            services.session.login(TEST_TOKEN).await?;
        }

        Ok(Self {
            backend,
            settings,
            services,
            temp_dir,
        })
    }

    fn create_test_settings(backend: &BackendMockServer, temp_dir: &TempDir, max_attempts: u32) -> Settings {
        let mut settings = Settings::default();
        settings.backend.base_url = backend.uri();
        settings.backend.timeout_seconds = 5;
        settings.retry.max_attempts = max_attempts;
        settings.retry.initial_backoff_ms = 10;
        settings.polling.alerts_interval_ms = 50;
        settings.polling.notifications_interval_ms = 50;
        settings.data_source.mode = DataSourceMode::Live;
        settings.session.storage_path = Some(
            temp_dir
                .path()
                .join("session.json")
                .to_string_lossy()
                .into_owned(),
        );
        settings
    }

    pub fn source(&self) -> DataSource {
        self.services.source.clone()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.settings.polling.alerts_interval_ms)
    }
}
