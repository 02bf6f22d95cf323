//! Configuration parsing and workspace-root resolution.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no adpress project found (missing {})", .0.display())]
    NotAProject(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Output format produced by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Html,
}

impl OutputFormat {
    /// File extension of the produced document.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Pdf
    }
}

/// Where to look for a configured theme/stylesheet.
///
/// `Auto` tries the document directory, the workspace root, and the document
/// directory's parent, in that order; the other two modes pin a single
/// location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylesheetMode {
    SameDir,
    ProjectRoot,
    Auto,
}

impl Default for StylesheetMode {
    fn default() -> Self {
        StylesheetMode::Auto
    }
}

/// Which conversion backend to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    Native,
    Container,
}

impl Default for BackendPreference {
    fn default() -> Self {
        BackendPreference::Native
    }
}

/// Build options (the `build:` section of adpress.yml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Load the converter's diagram plugin (asciidoctor-diagram).
    #[serde(default)]
    pub diagrams: bool,

    /// Theme/stylesheet file name to look for, e.g. `theme.yml` or
    /// `style.css`. Conversion proceeds with the converter default when the
    /// file cannot be found.
    #[serde(default)]
    pub stylesheet: Option<String>,

    #[serde(default)]
    pub stylesheet_mode: StylesheetMode,

    /// Open the produced document after a successful build.
    #[serde(default)]
    pub open: bool,
}

/// Native converter binaries (the `backend.native:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeConfig {
    #[serde(default = "default_pdf_program")]
    pub pdf_program: String,

    #[serde(default = "default_html_program")]
    pub html_program: String,
}

impl NativeConfig {
    /// Converter binary for the requested output format.
    pub fn program(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Pdf => &self.pdf_program,
            OutputFormat::Html => &self.html_program,
        }
    }
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            pdf_program: default_pdf_program(),
            html_program: default_html_program(),
        }
    }
}

/// Container runtime and converter image (the `backend.container:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container runtime binary, e.g. `docker` or `podman`.
    #[serde(default = "default_container_program")]
    pub program: String,

    #[serde(default = "default_container_image")]
    pub image: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            program: default_container_program(),
            image: default_container_image(),
        }
    }
}

/// Conversion backend settings (the `backend:` section).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub prefer: BackendPreference,

    #[serde(default)]
    pub native: NativeConfig,

    #[serde(default)]
    pub container: ContainerConfig,
}

/// Project configuration matching the adpress.yml schema.
///
/// Loaded fresh for every action; the tool reads this file and never writes
/// it. The directory holding the file is the workspace root, and every
/// relative path in here is interpreted against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Conversion output directory, relative to the workspace root.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Where export archives are written, relative to the workspace root.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    // Internal: path to config file (for workspace-root resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_output() -> PathBuf {
    PathBuf::from("output")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("archives")
}

fn default_pdf_program() -> String {
    "asciidoctor-pdf".to_string()
}

fn default_html_program() -> String {
    "asciidoctor".to_string()
}

fn default_container_program() -> String {
    "docker".to_string()
}

fn default_container_image() -> String {
    "asciidoctor/docker-asciidoctor".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is the "not a project" case: build and export refuse
    /// to guess at a workspace without one.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotAProject(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// The workspace root: the directory holding the config file.
    pub fn workspace_root(&self) -> PathBuf {
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Output directory as the converter sees it: relative to the workspace
    /// root. `None` when configured absolute and outside the given root.
    pub fn output_rel(&self, root: &Path) -> Option<PathBuf> {
        if self.output.is_relative() {
            Some(self.output.clone())
        } else {
            self.output
                .strip_prefix(root)
                .ok()
                .map(Path::to_path_buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.output, PathBuf::from("output"));
        assert_eq!(config.archive_dir, PathBuf::from("archives"));
        assert_eq!(config.build.format, OutputFormat::Pdf);
        assert!(!config.build.diagrams);
        assert!(config.build.stylesheet.is_none());
        assert_eq!(config.build.stylesheet_mode, StylesheetMode::Auto);
        assert_eq!(config.backend.prefer, BackendPreference::Native);
        assert_eq!(config.backend.native.pdf_program, "asciidoctor-pdf");
        assert_eq!(config.backend.native.html_program, "asciidoctor");
        assert_eq!(config.backend.container.program, "docker");
        assert_eq!(
            config.backend.container.image,
            "asciidoctor/docker-asciidoctor"
        );
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
output: build/out
archive_dir: exports

build:
  format: html
  diagrams: true
  stylesheet: style.css
  stylesheet_mode: project-root
  open: true

backend:
  prefer: container
  native:
    pdf_program: /opt/asciidoctor/bin/asciidoctor-pdf
  container:
    program: podman
    image: localhost/asciidoctor
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.output, PathBuf::from("build/out"));
        assert_eq!(config.archive_dir, PathBuf::from("exports"));
        assert_eq!(config.build.format, OutputFormat::Html);
        assert!(config.build.diagrams);
        assert_eq!(config.build.stylesheet.as_deref(), Some("style.css"));
        assert_eq!(config.build.stylesheet_mode, StylesheetMode::ProjectRoot);
        assert!(config.build.open);
        assert_eq!(config.backend.prefer, BackendPreference::Container);
        assert_eq!(
            config.backend.native.pdf_program,
            "/opt/asciidoctor/bin/asciidoctor-pdf"
        );
        // Unset fields inside a present section still default
        assert_eq!(config.backend.native.html_program, "asciidoctor");
        assert_eq!(config.backend.container.program, "podman");
    }

    #[test]
    fn test_missing_file_is_not_a_project() {
        let dir = TempDir::new().unwrap();
        let result = Config::from_file(dir.path().join("adpress.yml"));
        assert!(matches!(result, Err(ConfigError::NotAProject(_))));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adpress.yml");
        fs::write(&path, "output: [unclosed").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_workspace_root_is_config_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adpress.yml");
        fs::write(&path, "output: out\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.workspace_root(), dir.path());
    }

    #[test]
    fn test_bare_config_path_roots_at_cwd() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        // No config path recorded at all
        assert_eq!(config.workspace_root(), PathBuf::from("."));
    }

    #[test]
    fn test_output_rel() {
        let root = Path::new("/work/book");

        let relative: Config = serde_yaml::from_str("output: out\n").unwrap();
        assert_eq!(relative.output_rel(root), Some(PathBuf::from("out")));

        let inside: Config = serde_yaml::from_str("output: /work/book/out\n").unwrap();
        assert_eq!(inside.output_rel(root), Some(PathBuf::from("out")));

        let outside: Config = serde_yaml::from_str("output: /elsewhere/out\n").unwrap();
        assert_eq!(outside.output_rel(root), None);
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../../adpress.yml.example");
        let config: Config = serde_yaml::from_str(example).unwrap();

        // The example documents the defaults; it must not drift from them.
        assert_eq!(config.output, default_output());
        assert_eq!(config.backend.prefer, BackendPreference::Native);
        assert_eq!(config.backend.container.image, default_container_image());
    }

    #[test]
    fn test_stylesheet_modes_parse() {
        for (raw, expected) in [
            ("same-dir", StylesheetMode::SameDir),
            ("project-root", StylesheetMode::ProjectRoot),
            ("auto", StylesheetMode::Auto),
        ] {
            let yaml = format!("build:\n  stylesheet_mode: {}\n", raw);
            let config: Config = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(config.build.stylesheet_mode, expected);
        }
    }
}
