use crate::auth::JwtConfig;

/// Server configuration.
///
/// Every item can be overridden through the environment:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, uploads, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | JWT_SECRET | (generated in dev) | token signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and uploaded images
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
        }
    }

    /// Override work dir and port, keeping the rest env-derived. Used by
    /// tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory for uploaded product images.
    pub fn images_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("uploads/images")
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("storefront.db")
    }
}
