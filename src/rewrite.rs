//! Redirect stylesheet and script references in HTML documents to the
//! bundled and minified artifacts.
//!
//! Rewriting is table driven: each [`RewriteRule`] names the elements it
//! looks at, the attribute holding the reference, the source path it
//! matches and what to do on a match. Documents are streamed through
//! `lol_html`, so markup no rule touches is written back unchanged.

use crate::{
    config::{CssConfig, JsConfig},
    minify::minified_name,
};
use lol_html::{RewriteStrSettings, element, errors::RewritingError, rewrite_str};
use std::path::{Component, Path};

/// What happens to an element whose reference matches a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteAction {
    /// Point the attribute at the bundle, relative to the document.
    Bundle(String),
    /// Drop the whole element.
    Remove,
    /// Swap the file name, keeping the attribute's own path prefix.
    Rename(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub selector: &'static str,
    pub attribute: &'static str,
    /// Source path as written in the project, `/`-separated.
    pub source: String,
    pub action: RewriteAction,
}

impl RewriteRule {
    /// `value` refers to the source if it is the matched path itself or ends
    /// with `/` followed by it. Renamed scripts match on the file name
    /// alone, whatever directory the document loads them from.
    pub fn matches(&self, value: &str) -> bool {
        let path = match self.action {
            RewriteAction::Rename(_) => self.file_name(),
            _ => self.source.as_str(),
        };
        value == path
            || value
                .strip_suffix(path)
                .is_some_and(|head| head.ends_with('/'))
    }

    fn file_name(&self) -> &str {
        self.source.rsplit('/').next().unwrap_or_default()
    }

    /// Replacement value for a matching attribute, `None` for removal.
    fn replacement(&self, value: &str, depth: usize) -> Option<String> {
        match &self.action {
            RewriteAction::Bundle(bundle) => Some(format!("{}{bundle}", "../".repeat(depth))),
            RewriteAction::Remove => None,
            RewriteAction::Rename(name) => {
                let prefix = &value[..value.len() - self.file_name().len()];
                Some(format!("{prefix}{name}"))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlRewriter {
    rules: Vec<RewriteRule>,
}

impl HtmlRewriter {
    /// Build the rule table for the configured sources.
    ///
    /// The first stylesheet is redirected to the bundle, the others are
    /// removed. Every compressed script is renamed to its `.min.js` form.
    pub fn new(css: &CssConfig, js: &JsConfig) -> Self {
        let bundle = url_path(&css.bundle);
        let stylesheets = css.sources.iter().enumerate().map(|(i, source)| RewriteRule {
            selector: "link[href]",
            attribute: "href",
            source: url_path(source),
            action: if i == 0 {
                RewriteAction::Bundle(bundle.clone())
            } else {
                RewriteAction::Remove
            },
        });

        let scripts = js.scripts.iter().map(|name| RewriteRule {
            selector: "script[src]",
            attribute: "src",
            source: url_path(&js.dir.join(name)),
            action: RewriteAction::Rename(minified_name(name)),
        });

        Self {
            rules: stylesheets.chain(scripts).collect(),
        }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Rewrite one document. `depth` is the number of directories between
    /// the document and the output root (`0` for the root document).
    pub fn rewrite(&self, html: &str, depth: usize) -> Result<String, RewritingError> {
        let handlers = self
            .rules
            .iter()
            .map(|rule| {
                element!(rule.selector, move |el| {
                    if el.removed() {
                        return Ok(());
                    }
                    let Some(value) = el.get_attribute(rule.attribute) else {
                        return Ok(());
                    };
                    if !rule.matches(&value) {
                        return Ok(());
                    }
                    match rule.replacement(&value, depth) {
                        Some(new_value) => el.set_attribute(rule.attribute, &new_value)?,
                        None => el.remove(),
                    }
                    Ok(())
                })
            })
            .collect();

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: handlers,
                ..RewriteStrSettings::default()
            },
        )
    }
}

/// Relative path as it appears in a URL. `.` segments are dropped.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Directory depth of a document path relative to the output root.
pub fn document_depth(relative: &Path) -> usize {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
        .saturating_sub(1)
}
