use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser turning Rust source files into `syn` syntax trees.
///
/// Descriptors and data-shape types are read from these trees by the
/// [`extractor`](crate::extractor) and [`type_registry`](crate::type_registry)
/// modules.
pub struct SourceParser;

/// A successfully parsed Rust file with its syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed syntax tree
    pub syntax_tree: syn::File,
}

/// Result of parsing a batch of files.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Files that parsed, in input order
    pub parsed: Vec<ParsedFile>,
    /// Files that could not be read or parsed, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl SourceParser {
    /// Parses source text that is already in memory.
    pub fn parse_source(path: impl Into<PathBuf>, content: &str) -> Result<ParsedFile> {
        let path = path.into();
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile { path, syntax_tree })
    }

    /// Reads and parses a single Rust source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parses every file, keeping going past failures.
    ///
    /// A file that does not parse cannot contribute descriptors, so it is
    /// reported in [`ParseOutcome::skipped`] rather than aborting the run.
    pub fn parse_all(paths: &[PathBuf]) -> ParseOutcome {
        debug!("Parsing {} files", paths.len());

        let mut outcome = ParseOutcome::default();
        for path in paths {
            match Self::parse_file(path) {
                Ok(parsed) => outcome.parsed.push(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    outcome.skipped.push((path.clone(), format!("{:#}", e)));
                }
            }
        }

        debug!(
            "Parsing complete: {} succeeded, {} skipped",
            outcome.parsed.len(),
            outcome.skipped.len()
        );
        outcome
    }
}
