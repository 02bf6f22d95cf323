//! Project scaffolding from embedded templates.

use include_dir::{include_dir, Dir, DirEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Canned project templates, embedded at compile time.
static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Entry document every template ships.
pub const ENTRY_DOCUMENT: &str = "index.adoc";

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("directory {} already exists; refusing to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A scaffoldable project template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed template registry, in prompt order.
pub const TEMPLATE_SET: &[Template] = &[
    Template {
        id: "article",
        name: "Article",
        description: "Single self-contained document",
    },
    Template {
        id: "book",
        name: "Book",
        description: "Multi-chapter book with a PDF theme",
    },
    Template {
        id: "report",
        name: "Report",
        description: "HTML report with a stylesheet",
    },
];

/// Look up a template by identifier.
pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATE_SET.iter().find(|t| t.id == id)
}

/// Scaffold `parent/<name>` from a template and return the path of the
/// entry document.
///
/// Refuses when the target directory already exists; the existing tree is
/// left untouched. Files that appear concurrently are skipped rather than
/// overwritten.
pub fn create_project(
    parent: &Path,
    template_id: &str,
    name: &str,
) -> Result<PathBuf, ScaffoldError> {
    let template = find_template(template_id)
        .ok_or_else(|| ScaffoldError::UnknownTemplate(template_id.to_string()))?;
    let tree = TEMPLATES
        .get_dir(template.id)
        .ok_or_else(|| ScaffoldError::UnknownTemplate(template_id.to_string()))?;

    let target = parent.join(name);
    if target.exists() {
        return Err(ScaffoldError::AlreadyExists(target));
    }

    std::fs::create_dir_all(&target)?;
    extract_tree(tree, Path::new(template.id), &target)?;
    tracing::debug!("Scaffolded {} at {}", template.id, target.display());

    Ok(target.join(ENTRY_DOCUMENT))
}

// Embedded entry paths carry the template id as prefix; strip it so the
// template contents land directly in the target.
fn extract_tree(dir: &Dir<'_>, prefix: &Path, target: &Path) -> Result<(), ScaffoldError> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => {
                if let Ok(rel) = sub.path().strip_prefix(prefix) {
                    std::fs::create_dir_all(target.join(rel))?;
                }
                extract_tree(sub, prefix, target)?;
            }
            DirEntry::File(file) => {
                if let Ok(rel) = file.path().strip_prefix(prefix) {
                    let dest = target.join(rel);
                    if dest.exists() {
                        continue;
                    }
                    std::fs::write(dest, file.contents())?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, OutputFormat};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_registry_matches_embedded_trees() {
        for template in TEMPLATE_SET {
            let tree = TEMPLATES.get_dir(template.id);
            assert!(tree.is_some(), "no embedded tree for {}", template.id);
        }
    }

    #[test]
    fn test_find_template() {
        assert_eq!(find_template("book").map(|t| t.name), Some("Book"));
        assert!(find_template("poster").is_none());
    }

    #[test]
    fn test_create_article_project() {
        let dir = TempDir::new().unwrap();
        let entry = create_project(dir.path(), "article", "my-article").unwrap();

        let project = dir.path().join("my-article");
        assert_eq!(entry, project.join("index.adoc"));
        assert!(entry.is_file());
        assert!(project.join("adpress.yml").is_file());
    }

    #[test]
    fn test_create_book_project_has_chapters_and_theme() {
        let dir = TempDir::new().unwrap();
        create_project(dir.path(), "book", "my-book").unwrap();

        let project = dir.path().join("my-book");
        assert!(project.join("index.adoc").is_file());
        assert!(project.join("theme.yml").is_file());
        assert!(project.join("chapters/introduction.adoc").is_file());
    }

    #[test]
    fn test_refuses_existing_directory() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("taken");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("precious.txt"), "keep me").unwrap();

        let result = create_project(dir.path(), "article", "taken");
        assert!(matches!(result, Err(ScaffoldError::AlreadyExists(_))));

        // The existing tree is untouched: same single file, same contents.
        let entries: Vec<_> = fs::read_dir(&existing).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            fs::read_to_string(existing.join("precious.txt")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_unknown_template() {
        let dir = TempDir::new().unwrap();
        let result = create_project(dir.path(), "poster", "nope");
        assert!(matches!(result, Err(ScaffoldError::UnknownTemplate(_))));
        assert!(!dir.path().join("nope").exists());
    }

    #[test]
    fn test_template_configs_parse() {
        // Every scaffolded adpress.yml must load with the current schema.
        let dir = TempDir::new().unwrap();
        for template in TEMPLATE_SET {
            let project = dir.path().join(template.id);
            create_project(dir.path(), template.id, template.id).unwrap();
            let config = Config::from_file(project.join("adpress.yml")).unwrap();
            assert_eq!(config.workspace_root(), project);
        }
    }

    #[test]
    fn test_report_template_is_html() {
        let dir = TempDir::new().unwrap();
        create_project(dir.path(), "report", "weekly").unwrap();

        let project = dir.path().join("weekly");
        let config = Config::from_file(project.join("adpress.yml")).unwrap();
        assert_eq!(config.build.format, OutputFormat::Html);
        assert!(project.join("style.css").is_file());
    }
}
