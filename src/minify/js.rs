//! Page script compression.
//!
//! Scripts are compressed (dead code removal, constant folding) but never
//! mangled: functions called from inline handlers or from other scripts
//! must keep their names.

use crate::error::BuildError;
use oxc::{
    allocator::Allocator,
    codegen::{Codegen, CodegenOptions},
    minifier::{CompressOptions, Minifier, MinifierOptions},
    parser::Parser,
    span::SourceType,
};
use std::path::Path;

/// `scripts.js` -> `scripts.min.js`.
pub fn minified_name(file_name: &str) -> String {
    match file_name.strip_suffix(".js") {
        Some(stem) => format!("{stem}.min.js"),
        None => format!("{file_name}.min.js"),
    }
}

/// Compress one classic (non-module) script.
///
/// Returns `None` when nothing is left to write. `path` only labels errors.
pub fn minify_script(source: &str, path: &Path) -> Result<Option<String>, BuildError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_script(true);

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BuildError::ScriptParse {
            path: path.to_path_buf(),
            message,
        });
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: None,
        compress: Some(CompressOptions::default()),
    };
    Minifier::new(options).minify(&allocator, &mut program);

    let code = Codegen::new()
        .with_options(CodegenOptions::minify())
        .build(&program)
        .code;

    Ok((!code.trim().is_empty()).then_some(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(source: &str) -> Option<String> {
        minify_script(source, Path::new("scripts.js")).unwrap()
    }

    #[test]
    fn test_minified_name() {
        assert_eq!(minified_name("scripts.js"), "scripts.min.js");
        assert_eq!(minified_name("okna-prices.js"), "okna-prices.min.js");
        assert_eq!(minified_name("noext"), "noext.min.js");
    }

    #[test]
    fn test_strips_comments_and_whitespace() {
        let source = r#"
            // toggle the navbar
            /* block comment */
            window.addEventListener('DOMContentLoaded', function () {
                console.log('ready');
            });
        "#;
        let out = minify(source).unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("toggle the navbar"));
        assert!(!out.contains("block comment"));
        assert!(out.contains("addEventListener"));
    }

    #[test]
    fn test_global_names_are_not_mangled() {
        let source = r#"
            function showAlert(form, message, type) {
                const alertBox = document.createElement('div');
                alertBox.className = 'alert alert-' + type;
                form.appendChild(alertBox);
            }
            window.showAlert = showAlert;
        "#;
        let out = minify(source).unwrap();
        assert!(out.contains("showAlert"));
        assert!(out.contains("alertBox"));
    }

    #[test]
    fn test_dead_branch_removed() {
        let out = minify("if (false) { console.log('never'); } console.log('always');").unwrap();
        assert!(!out.contains("never"));
        assert!(out.contains("always"));
    }

    #[test]
    fn test_minifying_twice_keeps_behavior() {
        let once = minify("var total = 0; for (var i = 0; i < 3; i++) { total += i; } console.log(total);").unwrap();
        let twice = minify(&once).unwrap();
        assert!(twice.contains("console.log"));
        assert!(twice.contains("total"));
        assert!(twice.len() <= once.len());
    }

    #[test]
    fn test_empty_script_yields_none() {
        assert_eq!(minify("// only a comment\n"), None);
        assert_eq!(minify(""), None);
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let result = minify_script("function (", Path::new("form.js"));
        assert!(matches!(result, Err(BuildError::ScriptParse { .. })));
    }
}
