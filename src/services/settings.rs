//! Settings service
//!
//! Manages user preference persistence using JSON file storage.

use crate::config::{DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE, MIN_ITEMS_PER_PAGE};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Persisted user preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Directory page size. Changing it re-slices the current snapshot
    /// without a refetch.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_items_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
        }
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Get the directory page size
    pub async fn get_items_per_page(&self) -> Result<u32> {
        let settings = self.load().await?;
        Ok(settings.items_per_page)
    }

    /// Update the directory page size, clamped to the allowed range
    pub async fn set_items_per_page(&self, items_per_page: u32) -> Result<u32> {
        let clamped = items_per_page.clamp(MIN_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE);

        let mut settings = self.load().await?;
        settings.items_per_page = clamped;
        self.save(&settings).await?;

        Ok(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, _temp) = create_test_service();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }

    #[tokio::test]
    async fn test_page_size_update_is_clamped() {
        let (service, _temp) = create_test_service();

        assert_eq!(service.set_items_per_page(50).await.unwrap(), 50);
        assert_eq!(service.get_items_per_page().await.unwrap(), 50);

        assert_eq!(
            service.set_items_per_page(1).await.unwrap(),
            MIN_ITEMS_PER_PAGE
        );
        assert_eq!(
            service.set_items_per_page(10_000).await.unwrap(),
            MAX_ITEMS_PER_PAGE
        );
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(settings_path.clone());
            service.set_items_per_page(25).await.unwrap();
        }

        // A new service instance reads the persisted preference
        {
            let service = SettingsService::new(settings_path);
            assert_eq!(service.get_items_per_page().await.unwrap(), 25);
        }
    }

    #[tokio::test]
    async fn test_unknown_file_content_falls_back_to_default_field() {
        let (service, temp) = create_test_service();

        tokio::fs::write(temp.path().join("settings.json"), "{}")
            .await
            .unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }
}
