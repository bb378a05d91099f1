use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared server state: configuration, database pool and JWT service.
///
/// Cheap to clone (Arc/pool handles); one instance is shared across every
/// request.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub db: SqlitePool,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize state: ensure the working directory layout exists, open
    /// the database (running migrations) and build the JWT service from
    /// config.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(config.images_dir())
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db_service.pool, jwt_service))
    }

    pub fn get_db(&self) -> &SqlitePool {
        &self.db
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
