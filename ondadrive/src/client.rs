//! HTTP client for the drive catalog API
//!
//! Lists the audio files of the configured folder and derives the
//! direct-fetch URL for each track. The client is stateless; a fresh
//! playlist is built per session by the caller.

use crate::error::{Error, Result};
use crate::models::FileListResponse;
use ondaplaylist::{Playlist, Track};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default drive API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Default timeout for listing requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Media type of the relayed tracks
const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Drive catalog HTTP client
///
/// Construction validates the configuration (base URL shape, non-empty
/// folder id and API key); after that, [`DriveCatalogClient::fetch_url`]
/// is pure and infallible while [`DriveCatalogClient::list_tracks`] is
/// the only networked call.
#[derive(Debug, Clone)]
pub struct DriveCatalogClient {
    client: Client,
    base_url: Url,
    folder_id: String,
    api_key: String,
    timeout: Duration,
}

impl DriveCatalogClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from the global configuration
    pub fn from_config() -> Result<Self> {
        Self::from_config_obj(ondaconfig::get_config().as_ref())
    }

    /// Create a client from a specific Config object
    pub fn from_config_obj(config: &ondaconfig::Config) -> Result<Self> {
        use crate::config_ext::DriveConfigExt;
        Self::builder()
            .folder_id(config.get_drive_folder_id()?)
            .api_key(config.get_drive_api_key()?)
            .timeout(Duration::from_secs(config.get_drive_timeout_secs()))
            .build()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the playable tracks of the configured folder
    ///
    /// Queries the `files` endpoint filtered by parent folder and audio
    /// media type, excluding soft-deleted items, ordered by name. An
    /// empty folder yields `Ok(vec![])`, not an error; any transport or
    /// status failure means the catalog is unavailable for this session.
    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let url = self.files_endpoint();
        let query = format!(
            "'{}' in parents and mimeType='{}' and trashed=false",
            self.folder_id, AUDIO_MIME_TYPE
        );
        debug!(%url, %query, "Listing drive folder");

        let response = self
            .client
            .get(url)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id, name, webContentLink)"),
                ("orderBy", "name"),
                ("key", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus(status));
        }

        let listing: FileListResponse = response.json().await?;
        let tracks: Vec<Track> = listing.files.into_iter().map(Track::from).collect();

        if tracks.is_empty() {
            info!("No audio files found in the drive folder");
        } else {
            info!("Found {} audio files in the drive folder", tracks.len());
        }
        Ok(tracks)
    }

    /// Derive the direct-fetch URL for a track
    ///
    /// Pure: `{base}/files/{id}?alt=media&key={api_key}`. No network
    /// call; the base URL was validated at construction, so this cannot
    /// fail.
    pub fn fetch_url(&self, track: &Track) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .push("files")
            .push(&track.id);
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("key", &self.api_key);
        url
    }

    /// List the folder and shuffle the result into a fresh playlist
    pub async fn shuffled_playlist(&self) -> Result<Playlist> {
        let tracks = self.list_tracks().await?;
        let mut rng = rand::thread_rng();
        Ok(Playlist::shuffled(&tracks, &mut rng))
    }

    fn files_endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .push("files");
        url
    }
}

/// Builder for [`DriveCatalogClient`]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    folder_id: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl ClientBuilder {
    /// Override the API base URL (test hook)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the drive folder holding the audio files
    pub fn folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Set the API access key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the listing request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom reqwest client (shared connection pool, proxy, ...)
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> Result<DriveCatalogClient> {
        let base_url = Url::parse(
            self.base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/'),
        )?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "base URL cannot be a base: {base_url}"
            )));
        }

        let folder_id = self
            .folder_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::invalid_config("drive folder id is not set"))?;
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::invalid_config("drive API key is not set"))?;

        Ok(DriveCatalogClient {
            client: self.client.unwrap_or_default(),
            base_url,
            folder_id,
            api_key,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> DriveCatalogClient {
        DriveCatalogClient::builder()
            .folder_id("folder123")
            .api_key("key456")
            .build()
            .unwrap()
    }

    #[test]
    fn fetch_url_derivation_is_pure() {
        let client = test_client();
        let track = Track::new("file789", "song.mp3");
        let url = client.fetch_url(&track);
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/drive/v3/files/file789?alt=media&key=key456"
        );
    }

    #[test]
    fn builder_rejects_missing_credentials() {
        assert!(DriveCatalogClient::builder()
            .api_key("key")
            .build()
            .is_err());
        assert!(DriveCatalogClient::builder()
            .folder_id("folder")
            .api_key("")
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_unusable_base_url() {
        assert!(DriveCatalogClient::builder()
            .base_url("not a url")
            .folder_id("folder")
            .api_key("key")
            .build()
            .is_err());
    }
}
