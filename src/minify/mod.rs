//! Minification for the bundle stylesheet, page scripts and (optionally)
//! rewritten HTML documents.

pub mod css;
pub mod html;
pub mod js;

pub use css::{browser_targets, minify_css};
pub use html::minify_html;
pub use js::{minified_name, minify_script};
