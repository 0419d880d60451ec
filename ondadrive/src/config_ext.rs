//! Extension trait adding drive catalog getters to `ondaconfig::Config`
//!
//! Keeps the generic configuration crate free of catalog concerns; the
//! drive section of the YAML tree belongs to this crate.

use anyhow::{anyhow, Result};
use ondaconfig::Config;
use serde_yaml::Value;

use crate::client::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Drive catalog configuration accessors
///
/// Folder id and API key have no usable default: an empty value is a
/// startup-time configuration error surfaced before any session starts.
pub trait DriveConfigExt {
    /// The drive folder holding the MP3 files to relay
    fn get_drive_folder_id(&self) -> Result<String>;

    /// The API key used for listing and fetching
    fn get_drive_api_key(&self) -> Result<String>;

    /// Listing request timeout in seconds
    fn get_drive_timeout_secs(&self) -> u64;
}

impl DriveConfigExt for Config {
    fn get_drive_folder_id(&self) -> Result<String> {
        match self.get_value(&["drive", "folder_id"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("drive.folder_id is not configured")),
        }
    }

    fn get_drive_api_key(&self) -> Result<String> {
        match self.get_value(&["drive", "api_key"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("drive.api_key is not configured")),
        }
    }

    fn get_drive_timeout_secs(&self) -> u64 {
        match self.get_value(&["drive", "request_timeout_secs"]) {
            Ok(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap(),
            _ => DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
