//! Safelist rules: selectors kept even though no markup mentions them.
//!
//! Classes toggled by client-side script never show up in static HTML.
//! Each rule pairs a pattern with a mode deciding how the pattern is
//! applied to a selector's tokens:
//!
//! | Mode       | Tested against                 | Effect                                   |
//! |------------|--------------------------------|------------------------------------------|
//! | `Standard` | each token, as a whole         | the token counts as present              |
//! | `Deep`     | every token, at any depth      | selector and its nested rules are kept   |
//! | `Greedy`   | prefix of each required token  | selector is kept whatever else it needs  |
//!
//! Rules only decide keep/drop. They never alter or reorder CSS.

use super::{SelectorToken, SelectorTokens};
use crate::config::{ConfigError, SafelistConfig};
use regex::Regex;

/// A safelist pattern: `"/^btn/"` is a regex, anything else an exact token.
#[derive(Debug, Clone)]
pub enum SafelistPattern {
    Exact(String),
    Regex(Regex),
}

impl SafelistPattern {
    /// Parse a pattern from its configuration form.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(body) if !body.is_empty() => Regex::new(body)
                .map(Self::Regex)
                .map_err(|source| ConfigError::Pattern {
                    pattern: raw.to_owned(),
                    source,
                }),
            _ => Ok(Self::Exact(raw.to_owned())),
        }
    }

    /// Whole-token match.
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Regex(regex) => regex.is_match(name),
        }
    }

    /// Prefix match. Regexes decide their own anchoring.
    fn matches_prefix(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name.starts_with(exact.as_str()),
            Self::Regex(regex) => regex.is_match(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafelistMode {
    Standard,
    Deep,
    Greedy,
}

#[derive(Debug, Clone)]
pub struct SafelistRule {
    pub pattern: SafelistPattern,
    pub mode: SafelistMode,
}

impl SafelistRule {
    pub fn new(pattern: SafelistPattern, mode: SafelistMode) -> Self {
        Self { pattern, mode }
    }

    /// Does this rule make `token` count as present?
    pub fn covers(&self, token: &SelectorToken) -> bool {
        self.mode == SafelistMode::Standard && self.pattern.matches(token.name())
    }

    /// Does this rule keep the whole selector, whatever its other tokens?
    pub fn pins(&self, tokens: &SelectorTokens) -> bool {
        match self.mode {
            SafelistMode::Standard => false,
            SafelistMode::Deep => tokens.all().any(|t| self.pattern.matches(t.name())),
            SafelistMode::Greedy => tokens
                .required
                .iter()
                .any(|t| self.pattern.matches_prefix(t.name())),
        }
    }
}

/// Ordered collection of safelist rules.
#[derive(Debug, Clone, Default)]
pub struct Safelist {
    rules: Vec<SafelistRule>,
}

impl Safelist {
    pub fn new(rules: Vec<SafelistRule>) -> Self {
        Self { rules }
    }

    /// Compile the `[safelist]` section.
    pub fn from_config(config: &SafelistConfig) -> Result<Self, ConfigError> {
        let groups = [
            (&config.standard, SafelistMode::Standard),
            (&config.deep, SafelistMode::Deep),
            (&config.greedy, SafelistMode::Greedy),
        ];

        let mut rules = Vec::new();
        for (patterns, mode) in groups {
            for raw in patterns {
                rules.push(SafelistRule::new(SafelistPattern::parse(raw)?, mode));
            }
        }
        Ok(Self::new(rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if a standard rule covers `token`.
    pub fn covers(&self, token: &SelectorToken) -> bool {
        self.rules.iter().any(|rule| rule.covers(token))
    }

    /// The strongest mode pinning the selector, if any.
    ///
    /// `Deep` wins over `Greedy` since it also keeps nested rules.
    pub fn pinning_mode(&self, tokens: &SelectorTokens) -> Option<SafelistMode> {
        let pinned: Vec<_> = self
            .rules
            .iter()
            .filter(|rule| rule.pins(tokens))
            .map(|rule| rule.mode)
            .collect();

        if pinned.contains(&SafelistMode::Deep) {
            Some(SafelistMode::Deep)
        } else {
            pinned.first().copied()
        }
    }
}
