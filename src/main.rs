//! slimdist - purge, minify and bundle a static multi-page site.

mod assets;
mod build;
mod cli;
mod config;
mod error;
mod minify;
mod purge;
mod rewrite;
mod utils;

use anyhow::Result;
use build::{BuildReport, build_site};
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use std::{path::Path, process::ExitCode};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            log!("build"; "{}", report.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log!("error"; "{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load configuration, then build. `build_site` validates it first.
fn run(cli: &Cli) -> Result<BuildReport> {
    let config = SiteConfig::load(Path::new("./"))?;

    if let Some(path) = &config.config_path {
        log!("config"; "{}", path.display());
    }
    build_site(&config, cli.mode())
}
