//! Purge unused style rules from parsed stylesheets.
//!
//! Rules are filtered in place on the `lightningcss` AST, so the output is
//! always a subsequence of the input: nothing is added, moved or rewritten
//! apart from dropping unused selectors from a selector list.

use super::{ReachableSet, Safelist, SafelistMode, SelectorToken, SelectorTokens};
use crate::{error::BuildError, minify::browser_targets};
use lightningcss::{
    rules::{CssRule, style::StyleRule},
    selector::{Component, Selector},
    stylesheet::{ParserOptions, PrinterOptions, StyleSheet},
};
use std::path::PathBuf;

/// A stylesheet source and where it came from (for error messages).
#[derive(Debug, Clone)]
pub struct CssSource {
    pub path: PathBuf,
    pub text: String,
}

impl CssSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Purge every source and concatenate the results in input order.
///
/// Sources are merged into one text so later sources still override
/// earlier ones. A source that does not parse aborts the purge.
pub fn purge(
    sources: &[CssSource],
    reachable: &ReachableSet,
    safelist: &Safelist,
) -> Result<String, BuildError> {
    let purger = Purger {
        reachable,
        safelist,
    };

    let mut purged = Vec::with_capacity(sources.len());
    for source in sources {
        purged.push(purger.purge_source(source)?);
    }
    Ok(purged.join("\n"))
}

/// What to do with one selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Drop,
    Keep,
    /// Keep, along with every rule nested inside.
    KeepDeep,
}

struct Purger<'a> {
    reachable: &'a ReachableSet,
    safelist: &'a Safelist,
}

impl Purger<'_> {
    fn purge_source(&self, source: &CssSource) -> Result<String, BuildError> {
        let options = ParserOptions {
            filename: source.path.display().to_string(),
            ..ParserOptions::default()
        };
        let mut stylesheet =
            StyleSheet::parse(&source.text, options).map_err(|err| BuildError::CssParse {
                path: source.path.clone(),
                message: err.to_string(),
            })?;

        self.retain_rules(&mut stylesheet.rules.0);

        let printed = stylesheet
            .to_css(PrinterOptions {
                targets: browser_targets(),
                ..PrinterOptions::default()
            })
            .map_err(|err| BuildError::CssPrint {
                path: source.path.clone(),
                message: err.to_string(),
            })?;
        Ok(printed.code)
    }

    /// Filter a rule list, recursing into grouping at-rules.
    ///
    /// `@font-face` and `@keyframes` are referenced through property values
    /// the analyzer does not track, so they are always kept.
    fn retain_rules(&self, rules: &mut Vec<CssRule<'_>>) {
        rules.retain_mut(|rule| match rule {
            CssRule::Style(style) => self.retain_style(style),
            CssRule::Media(media) => {
                self.retain_rules(&mut media.rules.0);
                !media.rules.0.is_empty()
            }
            CssRule::Supports(supports) => {
                self.retain_rules(&mut supports.rules.0);
                !supports.rules.0.is_empty()
            }
            CssRule::LayerBlock(layer) => {
                self.retain_rules(&mut layer.rules.0);
                !layer.rules.0.is_empty()
            }
            CssRule::Container(container) => {
                self.retain_rules(&mut container.rules.0);
                !container.rules.0.is_empty()
            }
            // `@font-face`, `@keyframes` and the remaining at-rules.
            _ => true,
        });
    }

    /// Drop unused selectors; keep the rule if any selector survives.
    fn retain_style(&self, style: &mut StyleRule<'_>) -> bool {
        let mut deep = false;
        style.selectors.0.retain(|selector| match self.verdict(selector) {
            Verdict::Drop => false,
            Verdict::Keep => true,
            Verdict::KeepDeep => {
                deep = true;
                true
            }
        });

        if style.selectors.0.is_empty() {
            return false;
        }
        if !deep {
            self.retain_rules(&mut style.rules.0);
        }
        true
    }

    fn verdict(&self, selector: &Selector<'_>) -> Verdict {
        let tokens = selector_tokens(selector);

        match self.safelist.pinning_mode(&tokens) {
            Some(SafelistMode::Deep) => return Verdict::KeepDeep,
            Some(_) => return Verdict::Keep,
            None => {}
        }

        let present = tokens
            .required
            .iter()
            .all(|token| self.reachable.contains(token) || self.safelist.covers(token));
        if present { Verdict::Keep } else { Verdict::Drop }
    }
}

/// Split a selector into required and nested tokens.
///
/// `.nav > li:not(.active)::after` requires `nav` and `li`; `active` is
/// nested. Pseudo-classes, pseudo-elements and `*` require nothing.
pub fn selector_tokens(selector: &Selector<'_>) -> SelectorTokens {
    let mut tokens = SelectorTokens::default();
    collect_tokens(selector, &mut tokens, false);
    tokens
}

fn collect_tokens(selector: &Selector<'_>, tokens: &mut SelectorTokens, nested: bool) {
    let mut iter = selector.iter();
    loop {
        for component in &mut iter {
            let token = match component {
                Component::Class(name) => SelectorToken::Class(name.0.to_string()),
                Component::ID(name) => SelectorToken::Id(name.0.to_string()),
                Component::LocalName(local) => SelectorToken::Tag(local.lower_name.0.to_string()),
                Component::AttributeInNoNamespaceExists {
                    local_name_lower, ..
                } => SelectorToken::Attribute(local_name_lower.0.to_string()),
                Component::AttributeInNoNamespace { local_name, .. } => {
                    SelectorToken::Attribute(local_name.0.to_ascii_lowercase())
                }
                Component::AttributeOther(attr) => {
                    SelectorToken::Attribute(attr.local_name_lower.0.to_string())
                }
                Component::Negation(list) | Component::Is(list) | Component::Where(list) => {
                    for inner in list.iter() {
                        collect_tokens(inner, tokens, true);
                    }
                    continue;
                }
                _ => continue,
            };

            if nested {
                tokens.nested.push(token);
            } else {
                tokens.required.push(token);
            }
        }

        if iter.next_sequence().is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purge::{SafelistPattern, SafelistRule};

    fn reachable(tokens: &[SelectorToken]) -> ReachableSet {
        tokens.iter().cloned().collect()
    }

    fn class(name: &str) -> SelectorToken {
        SelectorToken::Class(name.into())
    }

    fn tag(name: &str) -> SelectorToken {
        SelectorToken::Tag(name.into())
    }

    fn safelist(rules: &[(&str, SafelistMode)]) -> Safelist {
        Safelist::new(
            rules
                .iter()
                .map(|(raw, mode)| SafelistRule::new(SafelistPattern::parse(raw).unwrap(), *mode))
                .collect(),
        )
    }

    fn purge_one(css: &str, used: &[SelectorToken], safelist: &Safelist) -> String {
        purge(&[CssSource::new("test.css", css)], &reachable(used), safelist).unwrap()
    }

    #[test]
    fn test_keeps_reachable_drops_unused() {
        let css = ".hero { z-index: 1; } .unused { z-index: 2; }";
        let out = purge_one(css, &[class("hero")], &Safelist::default());
        assert!(out.contains(".hero"));
        assert!(out.contains("z-index: 1"));
        assert!(!out.contains(".unused"));
        assert!(!out.contains("z-index: 2"));
    }

    #[test]
    fn test_every_required_token_must_be_reachable() {
        let css = ".card .title { color: red; } .card { z-index: 3; }";
        let out = purge_one(css, &[class("card")], &Safelist::default());
        assert!(!out.contains(".title"));
        assert!(out.contains("z-index: 3"));

        let out = purge_one(css, &[class("card"), class("title")], &Safelist::default());
        assert!(out.contains(".card .title"));
    }

    #[test]
    fn test_tag_and_id_selectors() {
        let css = "body { margin: 0; } table { border: 0; } #mainNav { top: 0; }";
        let out = purge_one(
            css,
            &[tag("body"), SelectorToken::Id("mainNav".into())],
            &Safelist::default(),
        );
        assert!(out.contains("body"));
        assert!(out.contains("#mainNav"));
        assert!(!out.contains("table"));
    }

    #[test]
    fn test_tokenless_selectors_survive() {
        let css = "* { box-sizing: border-box; } :root { --bs-blue: #0d6efd; } ::selection { color: red; }";
        let out = purge_one(css, &[], &Safelist::default());
        assert!(out.contains("box-sizing"));
        assert!(out.contains("--bs-blue"));
        assert!(out.contains("::selection"));
    }

    #[test]
    fn test_pseudo_classes_do_not_require_tokens() {
        let css = ".btn:hover { z-index: 1; } .btn:not(.disabled) { z-index: 2; }";
        let out = purge_one(css, &[class("btn")], &Safelist::default());
        assert!(out.contains(".btn:hover"));
        assert!(out.contains(".btn:not(.disabled)"));
        assert!(out.contains("z-index: 2"));
    }

    #[test]
    fn test_attribute_selectors() {
        let css = r#"[hidden] { display: none; } input[type="file"] { overflow: hidden; } [dir] { x: y; }"#;
        let out = purge_one(
            css,
            &[SelectorToken::Attribute("hidden".into()), tag("input"), SelectorToken::Attribute("type".into())],
            &Safelist::default(),
        );
        assert!(out.contains("[hidden]"));
        assert!(out.contains("input[type"));
        assert!(!out.contains("[dir]"));
    }

    #[test]
    fn test_selector_list_keeps_used_members() {
        let css = ".a, .b { z-index: 1; } .c, .d { z-index: 2; }";
        let out = purge_one(css, &[class("b")], &Safelist::default());
        assert!(out.contains(".b"));
        assert!(!out.contains(".a"));
        assert!(out.contains("z-index: 1"));
        assert!(!out.contains("z-index: 2"));
    }

    #[test]
    fn test_media_bodies_filtered_and_empty_media_dropped() {
        let css = "@media (min-width: 992px) { .hero { padding: 1rem; } .gone { padding: 2rem; } }
                   @media print { .gone { display: none; } }";
        let out = purge_one(css, &[class("hero")], &Safelist::default());
        assert!(out.contains("@media (min-width: 992px)"));
        assert!(out.contains(".hero"));
        assert!(!out.contains(".gone"));
        assert!(!out.contains("print"));
    }

    #[test]
    fn test_prefixed_declarations_survive() {
        let css = ".modal-backdrop { -webkit-backdrop-filter: blur(2px); backdrop-filter: blur(2px); }";
        let out = purge_one(css, &[class("modal-backdrop")], &Safelist::default());
        assert!(out.contains("-webkit-backdrop-filter: blur(2px)"));
        assert!(!out.contains(">="));
    }

    #[test]
    fn test_font_face_and_keyframes_always_kept() {
        let css = r#"@font-face { font-family: "Montserrat"; src: url("../fonts/m.woff2") format("woff2"); }
                     @keyframes spinner-border { to { transform: rotate(360deg); } }
                     .unused { animation: spinner-border 1s; }"#;
        let out = purge_one(css, &[], &Safelist::default());
        assert!(out.contains("@font-face"));
        assert!(out.contains("Montserrat"));
        assert!(out.contains("@keyframes spinner-border"));
        assert!(!out.contains(".unused"));
    }

    #[test]
    fn test_standard_safelist_covers_tokens() {
        let css = ".fade { opacity: 0; } .fade.show { opacity: 1; } .fade.extra { opacity: .5; }";
        let list = safelist(&[("/^fade$/", SafelistMode::Standard), ("show", SafelistMode::Standard)]);
        let out = purge_one(css, &[], &list);
        assert!(out.contains(".fade.show"));
        assert!(out.contains("opacity: 0"));
        assert!(!out.contains(".extra"));
    }

    #[test]
    fn test_greedy_keeps_modifier_variants() {
        let css = ".btn-outline-secondary:hover { color: #fff; } .btn-lg.unknown { padding: 1rem; }";
        let list = safelist(&[("/^btn/", SafelistMode::Greedy)]);
        let out = purge_one(css, &[], &list);
        assert!(out.contains(".btn-outline-secondary:hover"));
        assert!(out.contains(".btn-lg.unknown"));
    }

    #[test]
    fn test_deep_keeps_descendant_contexts() {
        let css = ".bs-tooltip-top .tooltip-arrow::before { top: -1px; }
                   body:not(.modal-backdrop) .x { color: red; }
                   .other .tooltip-arrow { top: 0; }";
        let list = safelist(&[
            ("/^bs-tooltip/", SafelistMode::Deep),
            ("/^modal-backdrop/", SafelistMode::Deep),
        ]);
        let out = purge_one(css, &[], &list);
        assert!(out.contains(".bs-tooltip-top .tooltip-arrow"));
        assert!(out.contains("modal-backdrop"));
        assert!(!out.contains(".other"));
    }

    #[test]
    fn test_sources_merge_in_input_order() {
        let sources = [
            CssSource::new("styles.css", ".a { z-index: 1; }"),
            CssSource::new("custom.css", ".a { z-index: 2; }"),
        ];
        let out = purge(&sources, &reachable(&[class("a")]), &Safelist::default()).unwrap();
        let base = out.find("z-index: 1").unwrap();
        let overlay = out.find("z-index: 2").unwrap();
        assert!(base < overlay);
    }

    #[test]
    fn test_preserves_rule_order() {
        let css = ".c { order: 1; } .x { order: 2; } .a { order: 3; } .b { order: 4; }";
        let out = purge_one(css, &[class("c"), class("a"), class("b")], &Safelist::default());
        let positions: Vec<_> = [".c", ".a", ".b"].iter().map(|s| out.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unparsable_source_is_fatal() {
        let result = purge(
            &[CssSource::new("broken.css", "..broken { color: red; }")],
            &ReachableSet::default(),
            &Safelist::default(),
        );
        match result {
            Err(BuildError::CssParse { path, .. }) => assert_eq!(path, PathBuf::from("broken.css")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_selector_tokens_split() {
        let css = ".nav > li:not(.active)::after { content: ''; }";
        let sheet = StyleSheet::parse(css, ParserOptions::default()).unwrap();
        let CssRule::Style(style) = &sheet.rules.0[0] else {
            panic!("expected a style rule");
        };
        let tokens = selector_tokens(&style.selectors.0[0]);
        assert!(tokens.required.contains(&class("nav")));
        assert!(tokens.required.contains(&tag("li")));
        assert_eq!(tokens.nested, vec![class("active")]);
    }
}
