//! Content documents and the tokens they statically reference.

use super::SelectorToken;
use crate::error::BuildError;
use scraper::Html;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

/// One HTML page, read once and never mutated.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    pub path: PathBuf,
    pub raw_text: String,
}

impl ContentDocument {
    pub fn new(path: impl Into<PathBuf>, raw_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Read a document from disk. Invalid UTF-8 is replaced, not rejected.
    pub fn read(path: &Path) -> Result<Self, BuildError> {
        let bytes = fs::read(path).map_err(|err| BuildError::io(path, err))?;
        let raw_text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Self::new(path, raw_text))
    }
}

/// Tokens present in at least one analyzed document.
#[derive(Debug, Clone, Default)]
pub struct ReachableSet {
    tokens: HashSet<SelectorToken>,
}

impl ReachableSet {
    pub fn contains(&self, token: &SelectorToken) -> bool {
        self.tokens.contains(token)
    }

    pub fn insert(&mut self, token: SelectorToken) -> bool {
        self.tokens.insert(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Add every token referenced by `document`.
    ///
    /// The HTML5 parser recovers from any input, so malformed regions
    /// simply contribute no tokens.
    pub fn scan(&mut self, document: &ContentDocument) {
        let html = Html::parse_document(&document.raw_text);

        for node in html.tree.values() {
            let Some(element) = node.as_element() else {
                continue;
            };

            self.insert(SelectorToken::Tag(element.name().to_owned()));

            for (name, value) in element.attrs() {
                self.insert(SelectorToken::Attribute(name.to_owned()));
                match name {
                    "class" => {
                        for class in value.split_whitespace() {
                            self.insert(SelectorToken::Class(class.to_owned()));
                        }
                    }
                    "id" if !value.trim().is_empty() => {
                        self.insert(SelectorToken::Id(value.trim().to_owned()));
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Extend<SelectorToken> for ReachableSet {
    fn extend<I: IntoIterator<Item = SelectorToken>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

impl FromIterator<SelectorToken> for ReachableSet {
    fn from_iter<I: IntoIterator<Item = SelectorToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Collect the tokens of every document.
pub fn analyze(documents: &[ContentDocument]) -> ReachableSet {
    let mut reachable = ReachableSet::default();
    for document in documents {
        reachable.scan(document);
    }
    reachable
}
