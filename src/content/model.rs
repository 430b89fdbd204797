//! Project records as stored in the content JSON files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Reference to one CDN asset. `public_id` is opaque and resolved by a
/// [`crate::media::MediaResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub public_id: String,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MediaItem {
    #[cfg(test)]
    pub fn image(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn video(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            kind: MediaKind::Video,
            ..Self::default()
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Items without an id render as a placeholder
    pub fn is_missing(&self) -> bool {
        self.public_id.trim().is_empty()
    }
}

/// One section of a project page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub profile: Vec<MediaItem>,
    #[serde(default)]
    pub detail: Vec<MediaItem>,
    #[serde(default)]
    pub gallery: Vec<MediaItem>,
}

impl Element {
    pub fn media(&self) -> impl Iterator<Item = &MediaItem> {
        self.profile
            .iter()
            .chain(self.detail.iter())
            .chain(self.gallery.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub year: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub thumbnails: Vec<MediaItem>,
    pub cover: MediaItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel: Option<MediaItem>,
}

impl Project {
    /// Every media reference of the project: cover, reel, thumbnails, then
    /// element media in page order.
    pub fn media(&self) -> impl Iterator<Item = &MediaItem> {
        std::iter::once(&self.cover)
            .chain(self.reel.iter())
            .chain(self.thumbnails.iter())
            .chain(self.elements.iter().flat_map(Element::media))
    }

    /// Thumbnail shown on the carousel card, falling back to the cover
    pub fn card_image(&self) -> &MediaItem {
        self.thumbnails.first().unwrap_or(&self.cover)
    }
}
