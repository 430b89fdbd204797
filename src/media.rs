//! CDN URL building for media references.

use serde::Deserialize;

use crate::content::{MediaItem, MediaKind};

/// Turns opaque media ids into fetchable URLs
pub trait MediaResolver {
    fn image_url(&self, item: &MediaItem, width: u32) -> String;
    fn video_url(&self, item: &MediaItem) -> String;

    /// URL appropriate for the item's kind
    fn url(&self, item: &MediaItem, width: u32) -> String {
        match item.kind {
            MediaKind::Image => self.image_url(item, width),
            MediaKind::Video => self.video_url(item),
        }
    }
}

/// Cloudinary delivery URLs:
/// `{base}/{cloud}/image/upload/w_{W},{transform}/{public_id}` and
/// `{base}/{cloud}/video/upload/{transform}/{public_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CloudinaryUrls {
    pub base_url: String,
    pub cloud_name: String,
    pub image_transform: String,
    pub video_transform: String,
}

impl Default for CloudinaryUrls {
    fn default() -> Self {
        Self {
            base_url: "https://res.cloudinary.com".into(),
            cloud_name: "demo".into(),
            image_transform: "f_auto,q_auto".into(),
            video_transform: "f_auto,q_auto".into(),
        }
    }
}

impl CloudinaryUrls {
    #[cfg(test)]
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            ..Self::default()
        }
    }

    fn root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.cloud_name.trim_matches('/')
        )
    }
}

fn join_transforms(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches(|c| c == ',' || c == '/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

impl MediaResolver for CloudinaryUrls {
    fn image_url(&self, item: &MediaItem, width: u32) -> String {
        let width = format!("w_{}", width.max(1));
        let transform = join_transforms(&[width.as_str(), self.image_transform.as_str()]);
        format!(
            "{}/image/upload/{transform}/{}",
            self.root(),
            item.public_id.trim_start_matches('/')
        )
    }

    fn video_url(&self, item: &MediaItem) -> String {
        let public_id = item.public_id.trim_start_matches('/');
        let transform = join_transforms(&[self.video_transform.as_str()]);
        if transform.is_empty() {
            format!("{}/video/upload/{public_id}", self.root())
        } else {
            format!("{}/video/upload/{transform}/{public_id}", self.root())
        }
    }
}
