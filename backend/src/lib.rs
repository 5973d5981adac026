//! Bakery management backend
//!
//! Function-level API over the shared computation crate: configuration,
//! error taxonomy, the snapshot store, the debounced writer, and the
//! services that tie them together. There is no network surface; embedders
//! open a `Session` and call its services directly.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod debounce;
pub mod error;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use debounce::{DebouncedWriter, SavePayload};
pub use error::{AppError, AppResult};
pub use state::SessionState;

use services::{
    CatalogService, CustomerService, InventoryService, OrderService, PurchaseService,
    ReportingService,
};
use store::{PgStore, SnapshotStore};

/// Load configuration, mapping failures into the application error type
pub fn load_config() -> AppResult<Config> {
    Config::load().map_err(|e| AppError::Configuration(e.to_string()))
}

/// Initialize tracing with an env-filter; safe to call once at startup
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bakery_management_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One running instance of the bakery core
///
/// Holds the in-memory working state (loaded from the store at open), the
/// debounced writer persisting it behind the scenes, and the services
/// embedders call.
#[derive(Clone)]
pub struct Session {
    pub config: Arc<Config>,
    pub state: Arc<SessionState>,
    pub store: Arc<dyn SnapshotStore>,
    pub writer: DebouncedWriter,
    pub orders: OrderService,
    pub inventory: InventoryService,
    pub catalog: CatalogService,
    pub customers: CustomerService,
    pub purchases: PurchaseService,
    pub reporting: ReportingService,
}

impl Session {
    /// Load the snapshot collections from a store and assemble a session
    pub async fn open(store: Arc<dyn SnapshotStore>, config: Config) -> AppResult<Self> {
        let state = SessionState::load(store.as_ref()).await?;
        let debounce = Duration::from_millis(config.persistence.debounce_ms);
        let (writer, _flush_task) = DebouncedWriter::spawn(store.clone(), debounce);

        Ok(Self {
            config: Arc::new(config),
            orders: OrderService::new(state.clone(), writer.clone()),
            inventory: InventoryService::new(state.clone(), store.clone(), writer.clone()),
            catalog: CatalogService::new(state.clone(), writer.clone()),
            customers: CustomerService::new(state.clone(), writer.clone()),
            purchases: PurchaseService::new(state.clone(), store.clone()),
            reporting: ReportingService::new(state.clone(), store.clone()),
            state,
            store,
            writer,
        })
    }

    /// Connect to PostgreSQL using the loaded configuration and open a
    /// session over it
    pub async fn connect(config: Config) -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let store = PgStore::connect(&config.database).await?;
        Self::open(Arc::new(store), config).await
    }

    /// Push all pending snapshot writes to the store and wait for them
    pub async fn flush(&self) -> AppResult<()> {
        self.writer.flush().await
    }
}
