//! Build orchestration.
//!
//! Stages run one after another, in a fixed order:
//!
//! ```text
//! build_site()
//!     │
//!     ├── OutputRoot::create()   wipe and recreate the output root
//!     │
//!     ├── build_stylesheet()     analyze documents → purge → minify → write bundle
//!     │
//!     │   (BuildMode::CssOnly stops here)
//!     │
//!     ├── build_scripts()        compress page scripts, copy vendor scripts
//!     ├── mirror_assets()        asset directories, then the favicon
//!     └── rewrite_documents()    point links/scripts at the new artifacts
//! ```
//!
//! The output root is owned by an [`OutputRoot`] guard for the whole run.
//! If a stage fails, the guard removes the partial tree, so a run leaves
//! either a complete output or none.

use crate::{
    assets::{CopyTask, copy_file},
    config::SiteConfig,
    error::BuildError,
    log,
    minify::{minified_name, minify_css, minify_html, minify_script},
    purge::{ContentDocument, CssSource, analyze, purge},
    rewrite::{HtmlRewriter, document_depth},
};
use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Stylesheet, scripts, assets and documents.
    #[default]
    Full,
    /// Only the purged, minified stylesheet.
    CssOnly,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Combined size of the CSS sources.
    pub css_source_bytes: usize,
    /// Size of the written bundle.
    pub css_bundle_bytes: usize,
    pub scripts_minified: usize,
    pub vendor_copied: usize,
    pub files_mirrored: usize,
    pub documents_rewritten: usize,
}

impl BuildReport {
    /// One-line summary for the final log line.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "css {} -> {} bytes",
            self.css_source_bytes, self.css_bundle_bytes
        );
        if self.documents_rewritten > 0 || self.scripts_minified > 0 || self.files_mirrored > 0 {
            summary.push_str(&format!(
                ", {} scripts, {} vendor, {} assets, {} documents",
                self.scripts_minified,
                self.vendor_copied,
                self.files_mirrored,
                self.documents_rewritten
            ));
        }
        summary
    }
}

/// Scoped ownership of the output directory.
///
/// Created empty; removed again on drop unless [`OutputRoot::commit`] ran.
#[derive(Debug)]
pub struct OutputRoot {
    path: PathBuf,
    committed: bool,
}

impl OutputRoot {
    /// Remove any previous output and create an empty root.
    pub fn create(path: &Path) -> Result<Self, BuildError> {
        if path.exists() {
            fs::remove_dir_all(path).map_err(|err| BuildError::io(path, err))?;
        }
        fs::create_dir_all(path).map_err(|err| BuildError::io(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            committed: false,
        })
    }

    /// Absolute location of an output-relative path.
    pub fn join(&self, relative: &Path) -> PathBuf {
        self.path.join(relative)
    }

    /// Write a new artifact. Writing the same path twice is an error.
    pub fn write(&self, relative: &Path, bytes: &[u8]) -> Result<PathBuf, BuildError> {
        let target = self.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|err| BuildError::io(&target, err))?;
        file.write_all(bytes)
            .map_err(|err| BuildError::io(&target, err))?;
        Ok(target)
    }

    /// Keep the output tree.
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        self.path.clone()
    }
}

impl Drop for OutputRoot {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Build the output tree for `config`.
pub fn build_site(config: &SiteConfig, mode: BuildMode) -> Result<BuildReport> {
    // Checked here so the output root is never wiped over source files.
    config.validate()?;

    let output_dir = config.output_dir();
    let output = OutputRoot::create(&output_dir).with_context(|| {
        format!("Failed to prepare output directory: {}", output_dir.display())
    })?;

    let mut report = BuildReport::default();
    let documents = collect_documents(config)?;

    build_stylesheet(config, &output, &documents, &mut report)
        .context("Failed to build stylesheet")?;

    if mode == BuildMode::Full {
        build_scripts(config, &output, &mut report).context("Failed to build scripts")?;
        mirror_assets(config, &output, &mut report).context("Failed to mirror assets")?;
        rewrite_documents(config, &output, &documents, &mut report)
            .context("Failed to rewrite documents")?;
    }

    output.commit();
    log!("build"; "done");
    Ok(report)
}

/// An HTML document and its path relative to the project root (which is
/// also its path relative to the output root).
#[derive(Debug)]
struct SourceDocument {
    relative: PathBuf,
    content: ContentDocument,
}

/// The root document (mandatory) followed by every `*.html` directly under
/// the pages directory (optional), sorted by name.
fn collect_documents(config: &SiteConfig) -> Result<Vec<SourceDocument>, BuildError> {
    let root_document = config.resolve(&config.build.root_document);
    if !root_document.is_file() {
        return Err(BuildError::MissingSource(root_document));
    }

    let mut documents = vec![SourceDocument {
        relative: config.build.root_document.clone(),
        content: ContentDocument::read(&root_document)?,
    }];

    let pages_dir = config.resolve(&config.build.pages);
    if pages_dir.is_dir() {
        let mut pages: Vec<PathBuf> = fs::read_dir(&pages_dir)
            .map_err(|err| BuildError::io(&pages_dir, err))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "html"))
            .collect();
        pages.sort();

        for path in pages {
            let Some(name) = path.file_name() else {
                continue;
            };
            documents.push(SourceDocument {
                relative: config.build.pages.join(name),
                content: ContentDocument::read(&path)?,
            });
        }
    }

    Ok(documents)
}

fn build_stylesheet(
    config: &SiteConfig,
    output: &OutputRoot,
    documents: &[SourceDocument],
    report: &mut BuildReport,
) -> Result<()> {
    let mut sources = Vec::with_capacity(config.css.sources.len());
    for relative in &config.css.sources {
        let path = config.resolve(relative);
        if !path.is_file() {
            return Err(BuildError::MissingSource(path).into());
        }
        let text = fs::read_to_string(&path).map_err(|err| BuildError::io(&path, err))?;
        sources.push(CssSource::new(relative, text));
    }
    report.css_source_bytes = sources.iter().map(|s| s.text.len()).sum();

    let contents: Vec<ContentDocument> = documents.iter().map(|d| d.content.clone()).collect();
    let reachable = analyze(&contents);
    let safelist = config.safelist()?;
    if reachable.is_empty() {
        log!("warn"; "no tokens found in documents, only safelisted selectors survive");
    }
    log!(
        "css";
        "{} tokens in {} documents, {} safelist rules",
        reachable.len(),
        contents.len(),
        safelist.len()
    );

    let purged = purge(&sources, &reachable, &safelist)?;
    let minified = minify_css(&purged, &config.css.bundle)?;
    for warning in &minified.warnings {
        log!("warn"; "{warning}");
    }

    output.write(&config.css.bundle, minified.css.as_bytes())?;
    report.css_bundle_bytes = minified.css.len();
    log!(
        "css";
        "{} ({} -> {} bytes)",
        config.css.bundle.display(),
        report.css_source_bytes,
        report.css_bundle_bytes
    );
    Ok(())
}

fn build_scripts(config: &SiteConfig, output: &OutputRoot, report: &mut BuildReport) -> Result<()> {
    let js_dir = &config.js.dir;

    for name in &config.js.scripts {
        let path = config.resolve(&js_dir.join(name));
        if !path.is_file() {
            continue;
        }
        let source = fs::read_to_string(&path).map_err(|err| BuildError::io(&path, err))?;
        let Some(code) = minify_script(&source, &path)? else {
            continue;
        };

        let relative = js_dir.join(minified_name(name));
        output.write(&relative, code.as_bytes())?;
        report.scripts_minified += 1;
        log!("js"; "{}", relative.display());
    }

    for name in &config.js.vendor {
        let relative = js_dir.join(name);
        if copy_file(&config.resolve(&relative), &output.join(&relative))? {
            report.vendor_copied += 1;
            log!("js"; "{} (copied)", relative.display());
        }
    }
    Ok(())
}

fn mirror_assets(config: &SiteConfig, output: &OutputRoot, report: &mut BuildReport) -> Result<()> {
    for dir in &config.assets.dirs {
        let copied = CopyTask::new(config.resolve(dir), output.join(dir)).run()?;
        if copied > 0 {
            report.files_mirrored += copied;
            log!("assets"; "{} ({} files)", dir.display(), copied);
        }
    }

    // Usually already mirrored along with its directory.
    if let Some(favicon) = &config.assets.favicon {
        let dest = output.join(favicon);
        if !dest.exists() && copy_file(&config.resolve(favicon), &dest)? {
            report.files_mirrored += 1;
            log!("assets"; "{}", favicon.display());
        }
    }
    Ok(())
}

fn rewrite_documents(
    config: &SiteConfig,
    output: &OutputRoot,
    documents: &[SourceDocument],
    report: &mut BuildReport,
) -> Result<()> {
    let rewriter = HtmlRewriter::new(&config.css, &config.js);

    for document in documents {
        let depth = document_depth(&document.relative);
        let html = rewriter
            .rewrite(&document.content.raw_text, depth)
            .map_err(|err| BuildError::Rewrite {
                path: document.content.path.clone(),
                message: err.to_string(),
            })?;

        let bytes = if config.html.minify {
            minify_html(html.as_bytes())
        } else {
            html.into_bytes()
        };

        output.write(&document.relative, &bytes)?;
        report.documents_rewritten += 1;
        log!("html"; "{}", document.relative.display());
    }
    Ok(())
}
