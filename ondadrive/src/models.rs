//! Data models for the drive `files` API responses

use ondaplaylist::Track;
use serde::{Deserialize, Serialize};

/// One file entry from a drive folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Opaque drive file id
    pub id: String,
    /// File name (e.g., "a.mp3")
    pub name: String,
    /// Browser-facing download link, when the listing includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_content_link: Option<String>,
}

impl DriveFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            web_content_link: None,
        }
    }
}

impl From<DriveFile> for Track {
    fn from(file: DriveFile) -> Self {
        match file.web_content_link {
            Some(link) => Track::with_hint(file.id, file.name, link),
            None => Track::new(file.id, file.name),
        }
    }
}

/// Response body of GET `files`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_listing() {
        let json = r#"{
            "files": [
                {"id": "abc", "name": "a.mp3", "webContentLink": "https://example.com/a"},
                {"id": "def", "name": "b.mp3"}
            ]
        }"#;
        let response: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.files.len(), 2);
        assert_eq!(response.files[0].id, "abc");
        assert_eq!(
            response.files[0].web_content_link.as_deref(),
            Some("https://example.com/a")
        );
        assert!(response.files[1].web_content_link.is_none());
    }

    #[test]
    fn missing_files_field_means_empty() {
        let response: FileListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.files.is_empty());
    }

    #[test]
    fn converts_to_track() {
        let track: Track = DriveFile::new("id1", "song.mp3").into();
        assert_eq!(track.id, "id1");
        assert_eq!(track.name, "song.mp3");
        assert!(track.fetch_hint.is_none());
    }
}
