//! `[build]`, `[css]`, `[js]`, `[assets]` and `[html]` sections.
//!
//! All paths are relative to the project root; `SiteConfig` resolves them.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section - output location and the HTML documents to process.
///
/// # Example
/// ```toml
/// [build]
/// output = "dist"
/// root_document = "index.html"
/// pages = "pages"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Output root. Destroyed and recreated on every run.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// The home document, written to the output root.
    #[serde(default = "defaults::build::root_document")]
    #[educe(Default = defaults::build::root_document())]
    pub root_document: PathBuf,

    /// Directory of subordinate documents (`*.html`, non-recursive).
    #[serde(default = "defaults::build::pages")]
    #[educe(Default = defaults::build::pages())]
    pub pages: PathBuf,
}

/// `[css]` section - stylesheets merged into one purged bundle.
///
/// The first source is the one whose `<link>` is redirected to the bundle;
/// links to the remaining sources are removed from rewritten documents.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct CssConfig {
    #[serde(default = "defaults::css::sources")]
    #[educe(Default = defaults::css::sources())]
    pub sources: Vec<PathBuf>,

    /// Bundle path, relative to the output root.
    #[serde(default = "defaults::css::bundle")]
    #[educe(Default = defaults::css::bundle())]
    pub bundle: PathBuf,
}

/// `[js]` section - scripts to compress and pre-minified scripts to copy.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct JsConfig {
    /// Script directory, mirrored by name under the output root.
    #[serde(default = "defaults::js::dir")]
    #[educe(Default = defaults::js::dir())]
    pub dir: PathBuf,

    /// File names compressed to `<stem>.min.js`.
    #[serde(default = "defaults::js::scripts")]
    #[educe(Default = defaults::js::scripts())]
    pub scripts: Vec<String>,

    /// Already minified third-party files, copied byte for byte.
    #[serde(default = "defaults::js::vendor")]
    #[educe(Default = defaults::js::vendor())]
    pub vendor: Vec<String>,
}

/// `[assets]` section - directories mirrored unchanged.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    #[serde(default = "defaults::assets::dirs")]
    #[educe(Default = defaults::assets::dirs())]
    pub dirs: Vec<PathBuf>,

    /// Single icon file, placed at the same relative path in the output.
    #[serde(default = "defaults::assets::favicon")]
    #[educe(Default = defaults::assets::favicon())]
    pub favicon: Option<PathBuf>,
}

/// `[html]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Minify rewritten documents. Off by default so untouched markup is
    /// written back byte for byte.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,
}
