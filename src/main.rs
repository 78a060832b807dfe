//! apidoc-from-source - Command-line tool for generating API documentation.
//!
//! Reads `#[api_group]` and `#[endpoint]` attributes from the sources of a Rust
//! project, resolves every documented handler against its group defaults, and
//! writes the resulting document as JSON or YAML.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Document every annotated group to a file:
//! ```bash
//! apidoc-from-source ./my-service -o doc/api-doc.json
//! ```
//!
//! Document two groups, in that order, as YAML:
//! ```bash
//! apidoc-from-source ./my-service -g ItemController -g AuthController -f yaml
//! ```
//!
//! Generate and host the viewer on port 8080:
//! ```bash
//! apidoc-from-source ./my-service --title "Shop API" --serve 127.0.0.1:8080
//! ```

use anyhow::Result;
use apidoc_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can configure the logger
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("apidoc-from-source starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
