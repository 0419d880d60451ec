//! Track descriptor: identity and metadata for one playable item

use serde::{Deserialize, Serialize};

/// One playable item from the catalog, without its audio bytes
///
/// Immutable once obtained from a listing. The `fetch_hint` is the
/// catalog's own download link when it provides one; the canonical fetch
/// URL is always derived from the `id` by the catalog client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque catalog identifier
    pub id: String,
    /// Display name (file name in the drive folder)
    pub name: String,
    /// Catalog-specific download hint, if the listing carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_hint: Option<String>,
}

impl Track {
    /// Create a track with no fetch hint
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fetch_hint: None,
        }
    }

    /// Create a track carrying the catalog's download hint
    pub fn with_hint(
        id: impl Into<String>,
        name: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fetch_hint: Some(hint.into()),
        }
    }
}
