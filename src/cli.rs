use crate::collector::EndpointCollector;
use crate::document::assemble;
use crate::extractor::extract_groups;
use crate::host::{host_to_server, serve, RouteTable};
use crate::parser::SourceParser;
use crate::scanner::SourceScanner;
use crate::serializer::{serialize, serialize_yaml, write_to_file};
use crate::service_info::ServiceInfo;
use crate::type_registry::TypeRegistry;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

/// Title used when neither the info file nor the flags provide one
pub const DEFAULT_TITLE: &str = "API Documentation";

/// API documentation from source - Generate endpoint documentation from annotated Rust handlers
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Handler group (type) to document; repeat to list several, in order.
    /// Without this every #[api_group] type is documented
    #[arg(short = 'g', long = "group", value_name = "TYPE")]
    pub groups: Vec<String>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Emit single-line JSON instead of pretty-printed JSON
    #[arg(long = "compact")]
    pub compact: bool,

    /// YAML or JSON file with the service information
    #[arg(long = "info", value_name = "FILE")]
    pub info_path: Option<PathBuf>,

    /// Service title
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Service version
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Service description
    #[arg(long = "description")]
    pub description: Option<String>,

    /// Terms of service
    #[arg(long = "terms-of-service", value_name = "TERMS")]
    pub terms_of_service: Option<String>,

    /// Contact entry, repeatable
    #[arg(long = "contact", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub contact: Vec<(String, String)>,

    /// License entry, repeatable
    #[arg(long = "license", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub license: Vec<(String, String)>,

    /// Serve the documentation over HTTP on this address after generating it
    #[arg(long = "serve", value_name = "ADDR")]
    pub serve_addr: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Parses a `KEY=VALUE` flag value. The value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    if let Some(info_path) = &args.info_path {
        if !info_path.is_file() {
            bail!("Info file does not exist: {}", info_path.display());
        }
    }

    if args.compact && args.output_format == OutputFormat::Yaml {
        warn!("--compact only applies to JSON output; ignoring it");
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if args.groups.is_empty() {
        info!("Groups: every #[api_group] type");
    } else {
        info!("Groups: {}", args.groups.join(", "));
    }

    Ok(args)
}

/// Builds the service information: flags win over the info file, and the
/// title falls back to [`DEFAULT_TITLE`].
pub fn service_info(args: &CliArgs) -> Result<ServiceInfo> {
    let from_file = match &args.info_path {
        Some(path) => {
            debug!("Loading service information from {}", path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read info file: {}", path.display()))?;
            serde_yaml::from_str::<ServiceInfo>(&content)
                .with_context(|| format!("Failed to parse info file: {}", path.display()))?
        }
        None => ServiceInfo::new(),
    };

    let mut from_flags = ServiceInfo::new();
    from_flags.title = args.title.clone();
    from_flags.version = args.api_version.clone();
    from_flags.description = args.description.clone();
    from_flags.terms_of_service = args.terms_of_service.clone();
    for (key, value) in &args.contact {
        from_flags = from_flags.add_contact(key.as_str(), value.as_str());
    }
    for (key, value) in &args.license {
        from_flags = from_flags.add_license(key.as_str(), value.as_str());
    }

    let mut info = from_flags.or(from_file);
    if info.title.is_none() {
        info = info.title(DEFAULT_TITLE);
    }
    Ok(info)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting documentation generation...");

    // Step 1: Scan directory for Rust files
    info!("Scanning project directory...");
    let scan_result = SourceScanner::new(args.project_path.clone()).scan()?;
    info!("Found {} Rust files", scan_result.source_files.len());

    if scan_result.source_files.is_empty() {
        bail!("No Rust files found in the project directory");
    }

    // Step 2: Parse files into syntax trees
    info!("Parsing Rust files...");
    let outcome = SourceParser::parse_all(&scan_result.source_files);
    info!(
        "Successfully parsed {} files ({} skipped)",
        outcome.parsed.len(),
        outcome.skipped.len()
    );

    if outcome.parsed.is_empty() {
        bail!("No files could be parsed successfully");
    }

    // Step 3: Register data-shape types
    let registry = TypeRegistry::from_files(&outcome.parsed);
    info!("Registered {} types", registry.len());

    // Step 4: Read handler groups and resolve their endpoints
    info!("Extracting handler groups...");
    let groups = extract_groups(&outcome.parsed, &args.groups)?;
    if groups.is_empty() {
        warn!("No #[api_group] types found in the project");
    }

    let endpoints = EndpointCollector::new(&registry).collect(&groups)?;

    // Step 5: Assemble and serialize
    let doc = assemble(service_info(&args)?, endpoints);

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize(&doc, !args.compact)?,
        OutputFormat::Yaml => serialize_yaml(&doc)?,
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.source_files.len());
    info!("  - Files parsed: {}", outcome.parsed.len());
    info!("  - Groups: {}", groups.len());
    info!("  - Endpoints: {}", doc.endpoints.len());

    // Step 7: Optionally host the result
    if let Some(addr) = &args.serve_addr {
        let mut table = RouteTable::new();
        host_to_server(&doc, Some(&mut table))?;
        serve(&table, addr)?;
    }

    Ok(())
}
