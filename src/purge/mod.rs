//! Selector reachability and CSS purging.
//!
//! # Flow
//!
//! ```text
//! ContentDocument[] ──► analyze() ──► ReachableSet ─┐
//!                                                   ├──► purge() ──► CSS text
//! CssSource[] ──────────────────────────────────────┤
//! Safelist (standard / deep / greedy) ──────────────┘
//! ```
//!
//! A selector survives when every token it requires was seen in the markup
//! (or is covered by a standard safelist rule), or when a deep/greedy rule
//! pins the whole selector.

pub mod content;
pub mod css;
pub mod safelist;

pub use content::{ContentDocument, ReachableSet, analyze};
pub use css::{CssSource, purge};
pub use safelist::{Safelist, SafelistMode, SafelistPattern, SafelistRule};

/// A class, id, tag or attribute name, as found in markup or in a selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorToken {
    Class(String),
    Id(String),
    Tag(String),
    Attribute(String),
}

impl SelectorToken {
    /// The bare name, without `.`/`#`/`[]` decoration.
    pub fn name(&self) -> &str {
        match self {
            Self::Class(name) | Self::Id(name) | Self::Tag(name) | Self::Attribute(name) => name,
        }
    }
}

/// Tokens of a single selector.
///
/// `required` tokens come from the compound selectors themselves and must
/// all be reachable for the selector to survive. `nested` tokens come from
/// functional pseudo-class arguments (`:not(.a)`, `:is(.b)`) and only
/// matter to deep safelist rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTokens {
    pub required: Vec<SelectorToken>,
    pub nested: Vec<SelectorToken>,
}

impl SelectorTokens {
    /// Every token, required first.
    pub fn all(&self) -> impl Iterator<Item = &SelectorToken> {
        self.required.iter().chain(&self.nested)
    }
}
