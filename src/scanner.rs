use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects the `.rs` files of a project.
///
/// Files are returned sorted by path within each directory, so handler
/// groups discovered from the sources always come out in the same order.
/// Build output (`target`) and hidden directories are skipped.
pub struct SourceScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Every discovered `.rs` file
    pub source_files: Vec<PathBuf>,
    /// Paths that could not be accessed
    pub warnings: Vec<String>,
}

impl SourceScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("Not a directory: {}", self.root_path.display());
        }

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !Self::is_ignored(e.path()));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && Self::is_rust_source(entry.path()) => {
                    source_files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Found {} source files under {}",
            source_files.len(),
            self.root_path.display()
        );

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }

    fn is_ignored(path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        name.starts_with('.') || name == "target"
    }

    fn is_rust_source(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some("rs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_collects_sorted_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/main.rs");
        touch(root, "src/controllers/items.rs");
        touch(root, "src/controllers/auth.rs");
        touch(root, "README.md");

        let result = SourceScanner::new(root.to_path_buf()).scan().unwrap();

        let relative: Vec<_> = result
            .source_files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("src/controllers/auth.rs"),
                PathBuf::from("src/controllers/items.rs"),
                PathBuf::from("src/main.rs"),
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_target_and_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/lib.rs");
        touch(root, "target/debug/build.rs");
        touch(root, ".git/hooks/hook.rs");

        let result = SourceScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.source_files, vec![root.join("src/lib.rs")]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let result = SourceScanner::new(PathBuf::from("/nonexistent/project")).scan();

        assert!(result.is_err());
    }
}
