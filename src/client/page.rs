//! Page content the client controller reads from.

use super::fade::FadeTarget;
use crate::models::{Persona, ProjectCard};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read access to the rendered page.
pub trait PageSource: Send + Sync {
    /// Raw text of the main content region, before whitespace normalisation.
    fn main_content(&self) -> String;

    fn project(&self, index: usize) -> Option<ProjectCard>;

    fn persona(&self) -> Persona;

    fn fade_targets(&self) -> Vec<FadeTarget>;
}

/// A portfolio page loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub persona: Persona,
    pub main_content: String,
    #[serde(default)]
    pub projects: Vec<ProjectCard>,
    #[serde(default)]
    pub fade_targets: Vec<FadeTarget>,
}

impl Page {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl PageSource for Page {
    fn main_content(&self) -> String {
        self.main_content.clone()
    }

    fn project(&self, index: usize) -> Option<ProjectCard> {
        self.projects.get(index).cloned()
    }

    fn persona(&self) -> Persona {
        self.persona.clone()
    }

    fn fade_targets(&self) -> Vec<FadeTarget> {
        self.fade_targets.clone()
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAGE_JSON: &str = r#"{
        "persona": { "owner": "Jane Doe", "assistant_name": "Abby" },
        "main_content": "Jane Doe\n\n  Senior Engineer\tRust, Go",
        "projects": [
            { "title": "Ledger", "highlights": ["Rust", "Postgres"] }
        ],
        "fade_targets": [
            { "id": "about", "top": 0.0, "height": 400.0 }
        ]
    }"#;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\n b\t c  "), "a b c");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_page_from_json() {
        let page = Page::from_json(PAGE_JSON).unwrap();
        assert_eq!(page.persona().assistant_name, "Abby");
        assert_eq!(page.project(0).unwrap().highlights, vec!["Rust", "Postgres"]);
        assert!(page.project(1).is_none());
        assert_eq!(page.fade_targets().len(), 1);
    }

    #[test]
    fn test_page_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PAGE_JSON.as_bytes()).unwrap();

        let page = Page::from_file(file.path()).unwrap();
        assert_eq!(page.projects[0].title, "Ledger");
    }

    #[test]
    fn test_page_missing_file_is_io_error() {
        let err = Page::from_file(Path::new("/nonexistent/page.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
