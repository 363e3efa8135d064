use std::path::Path;

use glob::Pattern;
use tracing::warn;

/// Glob exclusion list for catalog scanning. Patterns are matched against
/// the full file path.
#[derive(Debug, Clone, Default)]
pub struct ExcludeList {
    patterns: Vec<Pattern>,
}

impl ExcludeList {
    /// Create new exclusion list from pattern strings; invalid patterns are
    /// logged and dropped.
    pub fn new(patterns: &[String]) -> Self {
        let compiled: Vec<Pattern> = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        Self { patterns: compiled }
    }

    /// Get first matching pattern (for log messages)
    pub fn matching_pattern(&self, path: &Path) -> Option<String> {
        let path_str = path.to_string_lossy();
        self.patterns
            .iter()
            .find(|p| p.matches(&path_str))
            .map(|p| p.as_str().to_string())
    }
}
