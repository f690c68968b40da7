//! Stylesheet minification.
//!
//! Folds duplicate declarations, merges shorthands, strips comments and
//! whitespace. Problems that do not prevent printing are reported as
//! warnings rather than errors.

use crate::error::BuildError;
use lightningcss::{
    stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet},
    targets::{Browsers, Targets},
};
use std::{
    path::Path,
    sync::{Arc, RwLock},
};

/// `major.minor` in the encoding `lightningcss` uses for browser versions.
const fn version(major: u32, minor: u32) -> Option<u32> {
    Some((major << 16) | (minor << 8))
}

/// Oldest browsers the bundle must keep working in (the Bootstrap 5 floor).
///
/// Printing against these keeps `min-width` media queries instead of range
/// syntax and keeps vendor prefixes such as `-webkit-backdrop-filter`.
pub fn browser_targets() -> Targets {
    Targets::from(Browsers {
        android: version(6, 0),
        chrome: version(60, 0),
        edge: version(79, 0),
        firefox: version(60, 0),
        ios_saf: version(12, 0),
        opera: version(47, 0),
        safari: version(12, 0),
        samsung: version(8, 0),
        ..Browsers::default()
    })
}

/// Minified stylesheet plus any non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct MinifiedCss {
    pub css: String,
    pub warnings: Vec<String>,
}

/// Minify `css`. `name` only labels errors and warnings.
pub fn minify_css(css: &str, name: &Path) -> Result<MinifiedCss, BuildError> {
    let warnings = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        filename: name.display().to_string(),
        error_recovery: true,
        warnings: Some(Arc::clone(&warnings)),
        ..ParserOptions::default()
    };

    let mut stylesheet = StyleSheet::parse(css, options).map_err(|err| BuildError::CssParse {
        path: name.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut messages: Vec<String> = warnings
        .read()
        .map(|list| list.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    // A failed optimization pass still leaves a printable stylesheet.
    let targets = browser_targets();
    let minify_options = MinifyOptions {
        targets,
        ..MinifyOptions::default()
    };
    if let Err(err) = stylesheet.minify(minify_options) {
        messages.push(format!("optimization skipped: {err}"));
    }

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|err| BuildError::CssPrint {
            path: name.to_path_buf(),
            message: err.to_string(),
        })?;

    Ok(MinifiedCss {
        css: printed.code,
        warnings: messages,
    })
}
