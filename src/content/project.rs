use serde::{Deserialize, Serialize};

use super::{default_true, require_text, validate_url, ContentKind, ListingQuery};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for Project {
    const NAME: &'static str = "Project";
    const PATH: &'static str = "projects";

    type Update = Project;

    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        validate_url("imageUrl", self.image_url.as_deref())?;
        validate_url("demoUrl", self.demo_url.as_deref())?;
        validate_url("githubUrl", self.github_url.as_deref())
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: Project) -> Self {
        update
    }

    fn matches(&self, query: &ListingQuery) -> bool {
        query.featured.map_or(true, |featured| self.featured == featured)
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.projects()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_project_defaults() {
        let project: Project =
            serde_json::from_str(r#"{"title":"Folio","description":"Portfolio API"}"#).unwrap();
        assert!(project.published);
        assert!(!project.featured);
        assert!(project.technologies.is_empty());
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_bad_demo_url_rejected() {
        let project: Project = serde_json::from_str(
            r#"{"title":"Folio","description":"x","demoUrl":"ftp://example.com"}"#,
        )
        .unwrap();
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_featured_filter() {
        let mut project: Project =
            serde_json::from_str(r#"{"title":"Folio","description":"x"}"#).unwrap();
        let featured_only = ListingQuery { featured: Some(true) };

        assert!(project.matches(&ListingQuery::default()));
        assert!(!project.matches(&featured_only));
        project.featured = true;
        assert!(project.matches(&featured_only));
        assert!(!project.matches(&ListingQuery { featured: Some(false) }));
    }
}
