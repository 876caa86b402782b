//! Services module
//!
//! Session storage, the backend client and the data sources views read from.

pub mod api;
pub mod session;
pub mod source;

pub use api::ApiClient;
pub use session::{SessionStore, SessionData};
pub use source::{DataSource, DemoSource};

use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory wiring the session, client and data source from settings
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub session: SessionStore,
    pub api_client: ApiClient,
    pub source: DataSource,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub async fn new(settings: &Settings) -> Result<Self> {
        let session = SessionStore::open(&settings.session).await?;
        let api_client = ApiClient::new(&settings.backend, &settings.retry, session.clone())?;
        let source = DataSource::from_config(&settings.data_source, api_client.clone()).await?;

        Ok(Self {
            session,
            api_client,
            source,
        })
    }
}
