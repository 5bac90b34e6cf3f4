//! Application state and initialization
//!
//! All services are initialized here and made available through AppState.

use crate::error::Result;
use crate::services::{
    BoothService, BrandingService, CampaignService, KaryakartaService, ReportsService,
    SettingsService, VoterService,
};
use crate::services::directory::VoterDirectory;
use crate::store::{create_pool, DocumentStore};
use std::path::PathBuf;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub store: DocumentStore,
    pub directory: VoterDirectory,
    pub voters: VoterService,
    pub booths: BoothService,
    pub staff: KaryakartaService,
    pub campaigns: CampaignService,
    pub branding: BrandingService,
    pub reports: ReportsService,
    pub settings: SettingsService,
}

impl AppState {
    /// Application setup - called once on startup
    pub async fn initialize(app_data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;

        let pool = create_pool(&app_data_dir.join("matdaan.db")).await?;
        let store = DocumentStore::new(pool);

        let directory = VoterDirectory::new(store.clone());
        let settings = SettingsService::new(app_data_dir.clone());

        // Page-size preference is read once here so the first directory
        // request already uses it
        let items_per_page = settings.get_items_per_page().await?;
        tracing::info!("Directory page size: {}", items_per_page);

        let state = Self {
            app_data_dir,
            voters: VoterService::new(store.clone()),
            booths: BoothService::new(store.clone()),
            staff: KaryakartaService::new(store.clone()),
            campaigns: CampaignService::new(store.clone()),
            branding: BrandingService::new(store.clone()),
            reports: ReportsService::new(directory.clone()),
            directory,
            settings,
            store,
        };

        tracing::info!("Application initialized successfully");
        Ok(state)
    }
}

/// Initialize logging for embedding hosts that have no subscriber yet
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matdaan=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
