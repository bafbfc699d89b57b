//! HTTP remote store for the conference sync engine.
//!
//! Plugs the engine's [`RemoteStore`](conference_engine::RemoteStore)
//! contract into the questions server:
//!
//! ```rust,no_run
//! use conference_engine::SyncManager;
//! use conference_http::{Config, HttpRemote};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("http://localhost:8282")?;
//! let manager = SyncManager::new(Arc::new(HttpRemote::new(&config)?));
//!
//! manager.write("When is the keynote?")?;
//! manager.sync().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::{HttpRemote, QUESTIONS_PATH};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use wire::WireRecord;
