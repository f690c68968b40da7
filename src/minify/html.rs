//! Optional minification of rewritten HTML documents (`[html] minify`).

/// Minify an HTML document using the `minify_html` crate.
///
/// Closing tags and the `<html>`/`<head>` openers are kept so the output
/// stays friendly to hand-inspection and to older parsers. Inline scripts
/// and styles are minified too.
pub fn minify_html(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}
