//! `[safelist]` section - selectors that survive purging regardless of markup.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[safelist]` section.
///
/// Each entry is either an exact token (`"show"`) or a regular expression
/// wrapped in slashes (`"/^btn/"`).
///
/// # Example
/// ```toml
/// [safelist]
/// standard = ["show", "/^d-/"]
/// deep = ["/^modal-backdrop/"]
/// greedy = ["/^btn/"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SafelistConfig {
    /// Tokens treated as present in the markup.
    #[serde(default = "defaults::safelist::standard")]
    #[educe(Default = defaults::safelist::standard())]
    pub standard: Vec<String>,

    /// Keep any selector mentioning the token at any depth, with its nested rules.
    #[serde(default = "defaults::safelist::deep")]
    #[educe(Default = defaults::safelist::deep())]
    pub deep: Vec<String>,

    /// Keep any selector with a token starting with the pattern.
    #[serde(default = "defaults::safelist::greedy")]
    #[educe(Default = defaults::safelist::greedy())]
    pub greedy: Vec<String>,
}
