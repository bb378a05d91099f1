//! Storefront Server
//!
//! # Architecture
//!
//! HTTP API for a small e-commerce backend:
//!
//! - **Catalog** (`api/products`): product search, CRUD, image upload, reviews
//! - **Orders** (`api/orders`): order placement, lookup, payment
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **Database** (`db`): embedded SQLite via sqlx
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT auth, password hashing
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, ids
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env, create the working directory and initialize logging.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    init_logger_with_file(&log_level, Some(&log_dir));

    Ok(())
}
