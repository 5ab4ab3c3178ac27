//! Application State
//!
//! Global state shared by all commands, containing all services.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::{
    DesignerService, DirectorySink, Endpoints, HttpGenerationClient, PersistenceBridge,
};
use crate::storage::{ConfigService, Database};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, database_path};

/// Application state
pub struct AppState {
    /// SQLite database with connection pool
    database: Arc<RwLock<Option<Database>>>,
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// The live design workspace
    designer: Arc<RwLock<Option<Arc<DesignerService>>>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            database: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(None)),
            designer: Arc::new(RwLock::new(None)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Initialize all services at their default locations under ~/.brb-designer
    pub async fn initialize(&self) -> AppResult<()> {
        self.initialize_at(config_path()?, database_path()?).await
    }

    /// Initialize all services with explicit config and database files
    pub async fn initialize_at(&self, config_file: PathBuf, database_file: PathBuf) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        // Initialize config
        let config = ConfigService::at(config_file)?;
        let endpoints = Self::build_endpoints(&config)?;

        // Initialize database
        let db = Database::open(&database_file)?;

        // Initialize the designer on top of the database key-value store
        {
            let bridge = PersistenceBridge::new(Arc::new(db.clone()));
            let designer = DesignerService::new(bridge, endpoints);
            *self.designer.write().await = Some(Arc::new(designer));
        }

        info!(
            "[AppState] Initialized (service {}, timeout {}s)",
            config.get_config().service_base_url,
            config.get_config().request_timeout_secs
        );

        *self.database.write().await = Some(db);
        *self.config.write().await = Some(config);
        *initialized = true;
        Ok(())
    }

    fn build_endpoints(config: &ConfigService) -> AppResult<Endpoints> {
        let client = HttpGenerationClient::from_config(config.get_config())?;
        Ok(Endpoints {
            client: Arc::new(client),
            sink: Arc::new(DirectorySink::new(config.download_dir()?)),
            project_folder: config.get_config().project_folder.clone(),
        })
    }

    /// Whether `initialize` has completed
    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Check if database is healthy
    pub fn is_database_healthy(&self) -> bool {
        // Use try_read to avoid blocking
        if let Ok(guard) = self.database.try_read() {
            if let Some(ref db) = *guard {
                return db.is_healthy();
            }
        }
        false
    }

    /// Check if config is healthy
    pub fn is_config_healthy(&self) -> bool {
        if let Ok(guard) = self.config.try_read() {
            if let Some(ref config) = *guard {
                return config.is_healthy();
            }
        }
        false
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => Ok(config.get_config_clone()),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Update the configuration and point the designer at the new endpoints
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let (config, endpoints) = {
            let mut guard = self.config.write().await;
            match &mut *guard {
                Some(service) => {
                    let config = service.update_config(update)?;
                    (config, Self::build_endpoints(service)?)
                }
                None => return Err(AppError::config("Config service not initialized")),
            }
        };

        self.designer()
            .await?
            .reconfigure(endpoints)
            .await;
        info!("[AppState] Settings updated");
        Ok(config)
    }

    /// Get the designer service
    pub async fn designer(&self) -> AppResult<Arc<DesignerService>> {
        let guard = self.designer.read().await;
        match &*guard {
            Some(designer) => Ok(Arc::clone(designer)),
            None => Err(AppError::internal("Designer service not initialized")),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
