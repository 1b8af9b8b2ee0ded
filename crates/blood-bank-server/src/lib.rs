//! Blood Bank REST server.
//!
//! JSON API over [`blood_bank_core::BloodBankCore`]. Every core call runs on
//! the blocking pool; the SQLite connection is never touched from an async
//! worker thread.
//!
//! # Modules
//!
//! - [`config`]: TOML configuration
//! - [`error`]: `{success: false, message}` error responses
//! - [`routes`]: Router and handlers

pub mod config;
pub mod error;
pub mod routes;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::{router, AppState};

use blood_bank_core::{BloodBankCore, BloodBankResult};
use tokio::net::TcpListener;
use tracing::info;

/// Open the store named by `config` and build the router over it.
pub fn app(config: &Config) -> BloodBankResult<axum::Router> {
    let core = BloodBankCore::open(&config.database.path, config.core_settings())?;
    Ok(router(AppState::new(core)))
}

/// Serve `router` on `listener` until the process is stopped.
pub async fn serve(listener: TcpListener, router: axum::Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "blood bank API listening");
    }
    axum::serve(listener, router).await
}
