//! Project configuration, optionally read from `slimdist.toml`.
//!
//! Without a config file the defaults describe the layout the bundler was
//! written for, so a plain `slimdist` in the project directory just works.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[build]`    | Output root, root document, pages directory      |
//! | `[css]`      | Stylesheets to purge and the bundle path         |
//! | `[js]`       | Scripts to compress, third-party scripts to copy |
//! | `[assets]`   | Directories to mirror, favicon                   |
//! | `[safelist]` | Selectors kept regardless of markup              |
//! | `[html]`     | Optional minification of rewritten documents     |
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public"
//!
//! [safelist]
//! greedy = ["/^btn/", "/^carousel/"]
//!
//! [html]
//! minify = true
//! ```

mod build;
pub mod defaults;
mod error;
mod safelist;

pub use build::{AssetsConfig, BuildConfig, CssConfig, HtmlConfig, JsConfig};
pub use error::ConfigError;
pub use safelist::SafelistConfig;

use crate::purge::Safelist;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "slimdist.toml";

/// Root configuration structure representing `slimdist.toml`
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Project root every configured path is relative to
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Path of the loaded config file, if there was one
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub css: CssConfig,

    #[serde(default)]
    pub js: JsConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub safelist: SafelistConfig,

    #[serde(default)]
    pub html: HtmlConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Configuration for the project at `root`: `slimdist.toml` if present,
    /// defaults otherwise.
    pub fn load(root: &Path) -> Result<Self> {
        let root = normalize_path(root);
        let path = root.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        config.root = root;
        Ok(config)
    }

    /// Defaults rooted at `root`, ignoring any config file.
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }

    /// Resolve a project-relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.build.output)
    }

    /// Every source location the build reads, with the field naming it.
    fn inputs(&self) -> Vec<(&'static str, &Path)> {
        let mut inputs = vec![
            ("[build.root_document]", self.build.root_document.as_path()),
            ("[build.pages]", self.build.pages.as_path()),
            ("[js.dir]", self.js.dir.as_path()),
        ];
        inputs.extend(self.css.sources.iter().map(|p| ("[css.sources]", p.as_path())));
        inputs.extend(self.assets.dirs.iter().map(|p| ("[assets.dirs]", p.as_path())));
        inputs.extend(self.assets.favicon.iter().map(|p| ("[assets.favicon]", p.as_path())));
        inputs
    }

    /// Compile the configured safelist.
    pub fn safelist(&self) -> Result<Safelist, ConfigError> {
        Safelist::from_config(&self.safelist)
    }

    /// Reject configurations the build cannot run safely.
    pub fn validate(&self) -> Result<()> {
        if self.css.sources.is_empty() {
            bail!(ConfigError::Validation(
                "[css.sources] must have at least one element".into()
            ));
        }

        // The output root is wiped on every run.
        let root = normalize_path(&self.root);
        let output = lexical_join(&root, &self.build.output);
        if root.starts_with(&output) {
            bail!(ConfigError::Validation(format!(
                "[build.output] `{}` must not contain the project root",
                self.build.output.display()
            )));
        }
        for (field, input) in self.inputs() {
            if lexical_join(&root, input).starts_with(&output) {
                bail!(ConfigError::Validation(format!(
                    "[build.output] `{}` must not contain {field} `{}`",
                    self.build.output.display(),
                    input.display()
                )));
            }
        }
        for dir in &self.assets.dirs {
            if output.starts_with(lexical_join(&root, dir)) {
                bail!(ConfigError::Validation(format!(
                    "[build.output] `{}` must not be inside mirrored directory `{}`",
                    self.build.output.display(),
                    dir.display()
                )));
            }
        }

        if self.css.bundle.as_os_str().is_empty() {
            bail!(ConfigError::Validation("[css.bundle] must not be empty".into()));
        }

        self.safelist()?;
        Ok(())
    }
}

/// `root.join(relative)` with `.` and `..` folded away, without touching
/// the file system.
fn lexical_join(root: &Path, relative: &Path) -> PathBuf {
    let mut path = PathBuf::new();
    for component in root.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path.pop();
            }
            other => path.push(other),
        }
    }
    path
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.css.sources.len(), 2);
        assert_eq!(config.js.scripts.len(), 3);
        assert_eq!(config.assets.favicon, Some(PathBuf::from("assets/favicon.ico")));
        assert!(!config.html.minify);
    }

    #[test]
    fn test_partial_config() {
        let config = SiteConfig::from_str(
            r#"
            [build]
            output = "public"

            [html]
            minify = true
            "#,
        )
        .unwrap();
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.root_document, PathBuf::from("index.html"));
        assert!(config.html.minify);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(SiteConfig::from_str("[serve]\nport = 8080").is_err());
    }

    #[test]
    fn test_load_without_file() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert!(config.config_path.is_none());
        assert!(config.output_dir().ends_with("dist"));
    }

    #[test]
    fn test_load_reads_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[safelist]\ngreedy = [\"/^tooltip/\"]\n",
        )
        .unwrap();

        let config = SiteConfig::load(dir.path()).unwrap();
        assert!(config.config_path.is_some());
        assert_eq!(config.safelist.greedy, ["/^tooltip/"]);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[build\n").unwrap();
        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_validate_defaults() {
        let dir = tempdir().unwrap();
        assert!(SiteConfig::with_root(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_sources() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.css.sources.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("css.sources"));
    }

    #[test]
    fn test_validate_rejects_output_at_root() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());

        config.build.output = PathBuf::from(".");
        assert!(config.validate().is_err());

        config.build.output = PathBuf::from("..");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_output_over_sources() {
        let dir = tempdir().unwrap();
        let cases = [
            ("css", "[css.sources]"),
            ("./css/", "[css.sources]"),
            ("css/custom.css", "[css.sources]"),
            ("index.html", "[build.root_document]"),
            ("pages", "[build.pages]"),
            ("js", "[js.dir]"),
            ("fonts", "[assets.dirs]"),
            ("FontAwesome", "[assets.dirs]"),
        ];
        for (output, field) in cases {
            let mut config = SiteConfig::with_root(dir.path());
            config.build.output = PathBuf::from(output);
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(field), "{output}: {err}");
        }
    }

    #[test]
    fn test_validate_rejects_output_over_favicon() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.assets.dirs.clear();
        config.build.output = PathBuf::from("assets");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[assets.favicon]"));
    }

    #[test]
    fn test_validate_rejects_output_inside_mirrored_dir() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.build.output = PathBuf::from("assets/dist");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mirrored directory"));
    }

    #[test]
    fn test_validate_accepts_separate_output() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        for output in ["public", "./dist", "build/site"] {
            config.build.output = PathBuf::from(output);
            assert!(config.validate().is_ok(), "{output}");
        }
    }

    #[test]
    fn test_lexical_join() {
        let root = Path::new("/site");
        assert_eq!(lexical_join(root, Path::new("./css/")), PathBuf::from("/site/css"));
        assert_eq!(lexical_join(root, Path::new("..")), PathBuf::from("/"));
        assert_eq!(lexical_join(root, Path::new("a/../b")), PathBuf::from("/site/b"));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.safelist.deep.push("/(unclosed/".into());
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Pattern { .. })
        ));
    }
}
