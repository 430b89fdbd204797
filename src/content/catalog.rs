use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::model::Project;
use crate::error::{FolioError, FolioResult};

/// All projects of the site, in display order, keyed by slug.
///
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
    by_slug: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty and duplicate slugs.
    pub fn from_projects(projects: Vec<Project>) -> FolioResult<Self> {
        let mut by_slug = HashMap::with_capacity(projects.len());
        for (i, project) in projects.iter().enumerate() {
            let slug = project.slug.trim();
            if slug.is_empty() {
                return Err(FolioError::InvalidContent(format!(
                    "project #{i} (\"{}\") has an empty slug",
                    project.title
                )));
            }
            if by_slug.insert(slug.to_string(), i).is_some() {
                return Err(FolioError::DuplicateSlug(slug.to_string()));
            }
            for media in project.media().filter(|m| m.is_missing()) {
                warn!(slug, alt = ?media.alt, "media item without public_id");
            }
        }
        Ok(Self { projects, by_slug })
    }

    /// Parse a JSON array of projects
    pub fn from_json(json: &str) -> FolioResult<Self> {
        let projects: Vec<Project> = serde_json::from_str(json)?;
        Self::from_projects(projects)
    }

    /// Load from a JSON file holding an array of projects, or from a
    /// directory of one-project-per-file `*.json` (sorted by file name).
    pub async fn load(path: &Path) -> FolioResult<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let catalog = if metadata.is_dir() {
            Self::from_projects(load_dir(path).await?)?
        } else {
            Self::from_json(&tokio::fs::read_to_string(path).await?)?
        };
        info!(path = %path.display(), projects = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, slug: &str) -> Option<&Project> {
        self.by_slug.get(slug).map(|&i| &self.projects[i])
    }

    /// Like [`Catalog::get`], but a missing slug is an error
    pub fn require(&self, slug: &str) -> FolioResult<&Project> {
        self.get(slug)
            .ok_or_else(|| FolioError::ProjectNotFound(slug.to_string()))
    }

    pub fn by_index(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

async fn load_dir(dir: &Path) -> FolioResult<Vec<Project>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut projects = Vec::with_capacity(files.len());
    for file in files {
        debug!(file = %file.display(), "reading project file");
        let json = tokio::fs::read_to_string(&file).await?;
        let project: Project = serde_json::from_str(&json).map_err(|e| {
            FolioError::InvalidContent(format!("{}: {e}", file.display()))
        })?;
        projects.push(project);
    }
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::MediaItem;

    fn project(slug: &str) -> Project {
        Project {
            slug: slug.into(),
            title: slug.to_uppercase(),
            year: "2024".into(),
            role: "Editor".into(),
            client: None,
            elements: Vec::new(),
            thumbnails: Vec::new(),
            cover: MediaItem::image(format!("folio/{slug}/cover")),
            reel: None,
        }
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lookup_by_slug_and_index() {
        let catalog = Catalog::from_projects(vec![project("a"), project("b")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").unwrap().title, "B");
        assert_eq!(catalog.by_index(0).unwrap().slug, "a");
        assert!(catalog.get("zzz").is_none());
    }

    #[test]
    fn require_reports_missing_slug() {
        let catalog = Catalog::from_projects(vec![project("a")]).unwrap();
        match catalog.require("nope") {
            Err(FolioError::ProjectNotFound(slug)) => assert_eq!(slug, "nope"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_and_empty_slugs_are_rejected() {
        let dup = Catalog::from_projects(vec![project("a"), project("a")]);
        assert!(matches!(dup, Err(FolioError::DuplicateSlug(s)) if s == "a"));
        let empty = Catalog::from_projects(vec![project("  ")]);
        assert!(matches!(empty, Err(FolioError::InvalidContent(_))));
    }

    #[test]
    fn missing_media_is_not_an_error() {
        let mut p = project("a");
        p.cover = MediaItem::image("");
        assert!(Catalog::from_projects(vec![p]).is_ok());
    }

    #[tokio::test]
    async fn loads_array_file() {
        let dir = scratch_dir("array");
        let file = dir.join("projects.json");
        let json = serde_json::to_string(&vec![project("one"), project("two")]).unwrap();
        std::fs::write(&file, json).unwrap();

        let catalog = Catalog::load(&file).await.unwrap();
        let slugs: Vec<_> = catalog.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["one", "two"]);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn loads_directory_sorted_by_file_name() {
        let dir = scratch_dir("dir");
        for (file, slug) in [("02-b.json", "b"), ("01-a.json", "a")] {
            let json = serde_json::to_string(&project(slug)).unwrap();
            std::fs::write(dir.join(file), json).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::load(&dir).await.unwrap();
        let slugs: Vec<_> = catalog.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b"]);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_path_is_an_io_error() {
        let err = Catalog::load(Path::new("/definitely/not/here.json")).await;
        assert!(matches!(err, Err(FolioError::Io(_))));
    }
}
