//! Per-slug project lookup for layouts that load pages lazily.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info};

use super::catalog::Catalog;
use super::model::{MediaItem, Project};
use crate::error::{FolioError, FolioResult};

/// Project endpoint templates; `{slug}` is substituted
pub const DEFAULT_PROJECT_PATH: &str = "/api/projects/{slug}";
pub const DEFAULT_MEDIA_PATH: &str = "/api/projects/{slug}/media";

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Site base URL plus the project endpoint templates
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEndpoints {
    base_url: Url,
    project_path: String,
    media_path: String,
}

impl RemoteEndpoints {
    #[cfg(test)]
    pub fn new(base_url: &str) -> FolioResult<Self> {
        Self::with_paths(base_url, DEFAULT_PROJECT_PATH, DEFAULT_MEDIA_PATH)
    }

    /// Parse the base once; a URL that cannot carry a path is rejected here
    /// rather than at fetch time.
    pub fn with_paths(
        base_url: &str,
        project_path: impl Into<String>,
        media_path: impl Into<String>,
    ) -> FolioResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            FolioError::Config(format!("invalid remote base URL \"{base_url}\": {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FolioError::Config(format!(
                "remote base URL \"{base_url}\" cannot carry a path"
            )));
        }
        Ok(Self {
            base_url,
            project_path: project_path.into(),
            media_path: media_path.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn project_url(&self, slug: &str) -> Url {
        self.expand(&self.project_path, slug)
    }

    pub fn media_url(&self, slug: &str) -> Url {
        self.expand(&self.media_path, slug)
    }

    /// Template segments are appended to the base path; each segment is
    /// percent-encoded by `Url`, so a slug can never add a path level.
    fn expand(&self, template: &str, slug: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for part in template.split('/').filter(|part| !part.is_empty()) {
                segments.push(&part.replace("{slug}", slug));
            }
        }
        url
    }
}

/// Where project pages come from.
///
/// `Local` answers from the catalog already in memory; `Remote` asks the
/// site's JSON endpoints.
#[derive(Debug, Clone)]
pub enum ProjectSource {
    Local(Arc<Catalog>),
    Remote {
        client: reqwest::Client,
        endpoints: RemoteEndpoints,
    },
}

impl ProjectSource {
    pub fn local(catalog: Arc<Catalog>) -> Self {
        Self::Local(catalog)
    }

    pub fn remote(endpoints: RemoteEndpoints, timeout: Duration) -> FolioResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        info!(base = %endpoints.base_url(), "using remote project source");
        Ok(Self::Remote { client, endpoints })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub async fn fetch_project(&self, slug: &str) -> FolioResult<Project> {
        match self {
            Self::Local(catalog) => catalog.require(slug).cloned(),
            Self::Remote { client, endpoints } => {
                let url = endpoints.project_url(slug);
                debug!(%url, "fetching project");
                let response = client.get(url).send().await?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(FolioError::ProjectNotFound(slug.to_string()));
                }
                let project: Project = response.error_for_status()?.json().await?;
                if project.slug != slug {
                    return Err(FolioError::InvalidContent(format!(
                        "asked for \"{slug}\", endpoint answered \"{}\"",
                        project.slug
                    )));
                }
                Ok(project)
            }
        }
    }

    /// Every media reference of one project
    pub async fn fetch_media(&self, slug: &str) -> FolioResult<Vec<MediaItem>> {
        match self {
            Self::Local(catalog) => Ok(catalog.require(slug)?.media().cloned().collect()),
            Self::Remote { client, endpoints } => {
                let url = endpoints.media_url(slug);
                debug!(%url, "fetching project media");
                let response = client.get(url).send().await?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(FolioError::ProjectNotFound(slug.to_string()));
                }
                Ok(response.error_for_status()?.json().await?)
            }
        }
    }
}
