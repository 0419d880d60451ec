//! # ondadrive
//!
//! Catalog client for the drive-style HTTP API behind Onda Radio.
//!
//! The relay's music lives in one cloud drive folder. This crate resolves
//! that folder to an ordered list of playable tracks, and resolves each
//! track to a direct-fetch URL derived from its id and the configured API
//! key. It performs no audio I/O itself.
//!
//! # Example
//!
//! ```no_run
//! use ondadrive::DriveCatalogClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DriveCatalogClient::builder()
//!         .folder_id("folder-id")
//!         .api_key("api-key")
//!         .build()?;
//!
//!     let playlist = client.shuffled_playlist().await?;
//!     println!("{} tracks", playlist.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config_ext;
mod error;
mod models;

pub use client::{ClientBuilder, DriveCatalogClient, DEFAULT_BASE_URL};
pub use config_ext::DriveConfigExt;
pub use error::{Error, Result};
pub use models::{DriveFile, FileListResponse};
