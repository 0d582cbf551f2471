//! Ledger snapshot loading
//!
//! Reads the company, fiscal years, chart of accounts, cost centers and
//! postings that a trial balance runs over. Snapshots are YAML files that may
//! pull in further files through `include` (plain paths or glob patterns).

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod error;
pub mod types;

pub use error::LoadError;
pub use types::{
    AccountRecord, CompanyRecord, CostCenterRecord, FiscalYearRecord, LedgerSnapshot,
    PostingRecord,
};

/// Source reference type
pub type SourceRef = Arc<dyn LedgerSourceTrait>;

/// Trait for ledger snapshot sources
#[async_trait]
pub trait LedgerSourceTrait: Send + Sync {
    /// Parse a single snapshot document (includes are not followed)
    async fn parse(&self, content: &str) -> Result<LedgerSnapshot, LoadError>;

    /// Load from a file path, following includes
    async fn load_file(&self, path: PathBuf) -> Result<LedgerSnapshot, LoadError>;

    /// Load from a file path with base directory for resolving includes
    async fn load_file_with_base(
        &self,
        path: PathBuf,
        base_dir: PathBuf,
    ) -> Result<LedgerSnapshot, LoadError>;
}

/// YAML snapshot source
#[derive(Debug, Default)]
pub struct YamlLedgerSource;

impl YamlLedgerSource {
    fn parse_with_source(content: &str, location: &str) -> Result<LedgerSnapshot, LoadError> {
        if content.trim().is_empty() {
            return Ok(LedgerSnapshot::default());
        }
        serde_yaml::from_str(content).map_err(|e| LoadError::SyntaxError {
            location: location.to_string(),
            message: e.to_string(),
        })
    }

    /// Expand one include entry into the files it names, relative to `base_dir`
    fn resolve_include(base_dir: &Path, include: &str) -> Result<Vec<PathBuf>, LoadError> {
        if include.contains('*') || include.contains('?') {
            let pattern = base_dir.join(include);
            let pattern_str = pattern.to_string_lossy();
            let paths = glob::glob(&pattern_str).map_err(|_| LoadError::InvalidInclude {
                pattern: include.to_string(),
            })?;
            let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
            files.sort();
            Ok(files)
        } else {
            let path = base_dir.join(include);
            if path.exists() {
                Ok(vec![path])
            } else {
                log::warn!("Included snapshot not found: {}", path.display());
                Ok(vec![])
            }
        }
    }
}

#[async_trait]
impl LedgerSourceTrait for YamlLedgerSource {
    async fn parse(&self, content: &str) -> Result<LedgerSnapshot, LoadError> {
        Self::parse_with_source(content, "parse")
    }

    async fn load_file(&self, path: PathBuf) -> Result<LedgerSnapshot, LoadError> {
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        self.load_file_with_base(path, base_dir).await
    }

    async fn load_file_with_base(
        &self,
        path: PathBuf,
        base_dir: PathBuf,
    ) -> Result<LedgerSnapshot, LoadError> {
        let mut snapshot = LedgerSnapshot::default();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        // Depth-first, so each file's includes merge right after it
        let mut pending = vec![(path, base_dir)];

        while let Some((file, dir)) = pending.pop() {
            let key = tokio::fs::canonicalize(&file).await?;
            if !visited.insert(key) {
                log::warn!("Snapshot already loaded, skipping include: {}", file.display());
                continue;
            }

            let content = tokio::fs::read_to_string(&file).await?;
            let source_path = file.to_string_lossy().to_string();
            let mut part = Self::parse_with_source(&content, &source_path)?;
            log::debug!(
                "Loaded {}: {} accounts, {} postings",
                source_path,
                part.accounts.len(),
                part.postings.len()
            );

            let includes = std::mem::take(&mut part.include);
            snapshot.merge(part);

            for include in includes.iter().rev() {
                for included in Self::resolve_include(&dir, include)?.into_iter().rev() {
                    let included_base = included.parent().unwrap_or(&dir).to_path_buf();
                    pending.push((included, included_base));
                }
            }
        }

        Ok(snapshot)
    }
}
