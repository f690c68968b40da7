//! Command-line interface definitions.

use crate::build::BuildMode;
use clap::Parser;

/// Bundle a static site into a purged, minified `dist/` tree.
///
/// Run from the project root. Settings are read from `slimdist.toml` when
/// it exists.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only rebuild the purged stylesheet
    #[arg(long)]
    pub css_only: bool,
}

impl Cli {
    pub fn mode(&self) -> BuildMode {
        if self.css_only {
            BuildMode::CssOnly
        } else {
            BuildMode::Full
        }
    }
}
