//! Design catalog index
//!
//! One full scan per run: every configured root is walked recursively and
//! each file with the catalog extension becomes one [`IndexedDesignFile`],
//! keyed by its lower-cased, whitespace-collapsed stem. The index is never
//! updated incrementally and is read-only once built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ornament_core::{ParsedDesignParts, parse};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::exclude::ExcludeList;

/// One physical design file discovered under a catalog root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedDesignFile {
    pub path: PathBuf,
    pub normalized_key: String,
    #[serde(with = "time::serde::timestamp::option")]
    pub modified_at: Option<OffsetDateTime>,
    /// Parsed once at index time; the index is read-only afterwards
    #[serde(skip)]
    pub parts: ParsedDesignParts,
}

impl IndexedDesignFile {
    /// Build an entry from a path; `None` when the path has no usable stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stem = path.file_stem()?.to_str()?;
        let normalized_key = index_key(stem);
        if normalized_key.is_empty() {
            return None;
        }
        let parts = parse(&normalized_key);
        Some(Self {
            path,
            normalized_key,
            modified_at: None,
            parts,
        })
    }

    pub fn with_modified_at(mut self, modified_at: Option<OffsetDateTime>) -> Self {
        self.modified_at = modified_at;
        self
    }

    /// Stem as saved on disk (original casing).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Whole days since the file was last modified, if known.
    pub fn days_since_modified(&self, now: OffsetDateTime) -> Option<i64> {
        self.modified_at.map(|t| (now - t).whole_days())
    }
}

/// Index key for a filename stem: lower-cased, whitespace runs collapsed.
pub fn index_key(stem: &str) -> String {
    stem.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// What to scan and how.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Curated list of roots; anything not listed is never scanned.
    pub roots: Vec<PathBuf>,
    /// File extension without the dot (compared case-insensitively).
    pub extension: String,
    pub exclude: ExcludeList,
}

impl CatalogOptions {
    pub fn new(roots: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            roots,
            extension: extension.into(),
            exclude: ExcludeList::default(),
        }
    }

    pub fn with_exclude(mut self, exclude: ExcludeList) -> Self {
        self.exclude = exclude;
        self
    }
}

/// Scan statistics for one configured root.
#[derive(Debug, Clone, Serialize)]
pub struct RootSummary {
    pub root: PathBuf,
    pub files: usize,
    pub missing: bool,
}

/// In-memory index of every design file in the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: BTreeMap<String, IndexedDesignFile>,
    roots: Vec<RootSummary>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan all configured roots. Missing roots and unreadable entries are
    /// logged and skipped; the scan itself never fails.
    pub fn build(options: &CatalogOptions) -> Self {
        let mut index = Self::new();
        let extension = options.extension.trim_start_matches('.').to_string();

        for root in &options.roots {
            if !root.is_dir() {
                warn!("Catalog directory not found: {}", root.display());
                index.roots.push(RootSummary {
                    root: root.clone(),
                    files: 0,
                    missing: true,
                });
                continue;
            }

            debug!("Scanning {}", root.display());
            let mut count = 0;

            for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable catalog entry: {}", e);
                        continue;
                    }
                };

                let path = entry.path();
                if !entry.file_type().is_file() || !has_extension(path, &extension) {
                    continue;
                }

                if let Some(pattern) = options.exclude.matching_pattern(path) {
                    debug!("Excluded {} (matches {})", path.display(), pattern);
                    continue;
                }

                let modified_at = entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .map(OffsetDateTime::from);

                match IndexedDesignFile::from_path(path) {
                    Some(file) => {
                        index.insert(file.with_modified_at(modified_at));
                        count += 1;
                    }
                    None => warn!("Skipping {}: file name is not valid UTF-8", path.display()),
                }
            }

            info!("Found {} files in {}", count, root.display());
            index.roots.push(RootSummary {
                root: root.clone(),
                files: count,
                missing: false,
            });
        }

        info!("Total indexed designs: {}", index.len());
        index
    }

    /// Build an index from known paths without touching the filesystem.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut index = Self::new();
        for path in paths {
            if let Some(file) = IndexedDesignFile::from_path(path) {
                index.insert(file);
            }
        }
        index
    }

    /// Insert an entry; on key collision the later entry wins.
    pub fn insert(&mut self, file: IndexedDesignFile) {
        if let Some(previous) = self.entries.insert(file.normalized_key.clone(), file) {
            debug!(
                "Catalog key collision on {:?}; replaced {}",
                previous.normalized_key,
                previous.path.display()
            );
        }
    }

    /// Case-insensitive equality on the raw target against indexed keys.
    pub fn lookup_exact(&self, filename: &str) -> Option<&IndexedDesignFile> {
        self.entries.get(&filename.to_lowercase())
    }

    /// All entries in key order.
    pub fn all_entries(&self) -> impl Iterator<Item = (&str, &IndexedDesignFile)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn roots(&self) -> &[RootSummary] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
