//! Design matcher
//!
//! Classifies a target design filename against the catalog in three
//! ordered stages, first hit wins:
//!
//! 1. Exact: normalized target equals a normalized catalog key
//! 2. Fuzzy: highest-version file of the same design family; differing
//!    year (or center) means the design needs an update
//! 3. Otherwise the design still needs to be made

use std::cmp::Ordering;
use std::fmt;

use ornament_core::{CenterChangePolicy, ParsedDesignParts, normalize_for_matching, parse};
use ornament_sources::{CatalogIndex, IndexedDesignFile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classification of one design against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Exists,
    NeedsUpdate,
    NeedsMade,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 3] = [Self::Exists, Self::NeedsUpdate, Self::NeedsMade];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::NeedsUpdate => "needs_update",
            Self::NeedsMade => "needs_made",
        }
    }

    /// Heading used in text reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exists => "Already Made",
            Self::NeedsUpdate => "Needs Update",
            Self::NeedsMade => "Needs Made",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field that differs between the catalog file and the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.field, self.old, self.new)
    }
}

/// Result of classifying one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub status: MatchStatus,
    pub matched_file: Option<IndexedDesignFile>,
    pub changes: Vec<FieldChange>,
}

impl MatchOutcome {
    /// Changes joined for display; `None` when nothing differs.
    pub fn diff_description(&self) -> Option<String> {
        if self.changes.is_empty() {
            None
        } else {
            Some(describe(&self.changes))
        }
    }

    fn exists(file: &IndexedDesignFile) -> Self {
        Self {
            status: MatchStatus::Exists,
            matched_file: Some(file.clone()),
            changes: Vec::new(),
        }
    }

    fn needs_update(file: &IndexedDesignFile, changes: Vec<FieldChange>) -> Self {
        Self {
            status: MatchStatus::NeedsUpdate,
            matched_file: Some(file.clone()),
            changes,
        }
    }

    fn needs_made() -> Self {
        Self {
            status: MatchStatus::NeedsMade,
            matched_file: None,
            changes: Vec::new(),
        }
    }
}

/// Human-readable change list: `"Year: 2024 → 2025 | Center: Star → Flk"`.
pub fn describe(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// A fuzzy candidate together with its parsed name.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub file: &'a IndexedDesignFile,
    pub parts: &'a ParsedDesignParts,
}

impl Candidate<'_> {
    fn file_name(&self) -> String {
        self.file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DesignMatcher {
    center_change: CenterChangePolicy,
}

impl DesignMatcher {
    pub fn new(center_change: CenterChangePolicy) -> Self {
        Self { center_change }
    }

    /// Classify `target` against the catalog. Never fails; an unparseable
    /// target simply falls through to [`MatchStatus::NeedsMade`].
    pub fn classify(&self, target: &str, catalog: &CatalogIndex) -> MatchOutcome {
        if let Some(file) = self.exact_match(target, catalog) {
            debug!("Exact match for {}: {}", target, file.path.display());
            return MatchOutcome::exists(file);
        }

        let wanted = parse(target);
        let Some(best) = self.candidates(&wanted, catalog).into_iter().next() else {
            debug!("No match for {}; needs to be made", target);
            return MatchOutcome::needs_made();
        };

        let changes = compare(best.parts, &wanted);
        if changes.is_empty() {
            debug!("Family match for {}: {}", target, best.file.path.display());
            MatchOutcome::exists(best.file)
        } else {
            let outcome = MatchOutcome::needs_update(best.file, changes);
            debug!(
                "Update candidate for {}: {} ({})",
                target,
                best.file.path.display(),
                outcome.diff_description().unwrap_or_default()
            );
            outcome
        }
    }

    /// Catalog entry whose key folds to the same text as `target`.
    pub fn exact_match<'a>(
        &self,
        target: &str,
        catalog: &'a CatalogIndex,
    ) -> Option<&'a IndexedDesignFile> {
        let wanted = normalize_for_matching(target);
        catalog
            .all_entries()
            .find(|(key, _)| normalize_for_matching(key) == wanted)
            .map(|(_, file)| file)
    }

    /// Every catalog entry in the target's family, best first: highest
    /// version, then file name ascending.
    pub fn candidates<'a>(
        &self,
        wanted: &ParsedDesignParts,
        catalog: &'a CatalogIndex,
    ) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = catalog
            .all_entries()
            .map(|(_, file)| Candidate {
                file,
                parts: &file.parts,
            })
            .filter(|c| self.is_related(c.parts, wanted))
            .collect();

        candidates.sort_by(rank);
        candidates
    }

    fn is_related(&self, candidate: &ParsedDesignParts, wanted: &ParsedDesignParts) -> bool {
        match self.center_change {
            CenterChangePolicy::NewDesign => candidate.same_family(wanted),
            CenterChangePolicy::Update => candidate.same_variant(wanted),
        }
    }
}

fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.parts
        .version
        .cmp(&a.parts.version)
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// Changes needed to turn the catalog design `have` into `want`.
fn compare(have: &ParsedDesignParts, want: &ParsedDesignParts) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if have.center_type != want.center_type {
        changes.push(FieldChange {
            field: "Center",
            old: have.center_type.as_token().to_string(),
            new: want.center_type.as_token().to_string(),
        });
    }

    if have.year != want.year {
        changes.push(FieldChange {
            field: "Year",
            old: year_label(&have.year),
            new: year_label(&want.year),
        });
    }

    changes
}

fn year_label(year: &str) -> String {
    if year.is_empty() {
        "No Year".to_string()
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> CatalogIndex {
        CatalogIndex::from_paths(names.iter().map(|n| format!("/designs/{n}.svg")))
    }

    fn matched_stem(outcome: &MatchOutcome) -> Option<String> {
        outcome.matched_file.as_ref().map(IndexedDesignFile::stem)
    }

    #[test]
    fn test_version_ordering() {
        let index = catalog(&["Amber Star", "Amber 2 Star", "Amber 3 Star"]);
        let matcher = DesignMatcher::default();

        let candidates = matcher.candidates(&parse("Amber Star"), &index);
        let order: Vec<String> = candidates.iter().map(|c| c.file.stem()).collect();
        assert_eq!(order, vec!["Amber 3 Star", "Amber 2 Star", "Amber Star"]);
    }

    #[test]
    fn test_candidates_use_indexed_parts() {
        let index = catalog(&["Amber 2 Star", "Zoe Star"]);
        let candidates = DesignMatcher::default().candidates(&parse("Amber Star"), &index);

        assert_eq!(candidates.len(), 1);
        let candidate = candidates[0];
        assert!(std::ptr::eq(candidate.parts, &candidate.file.parts));
        assert_eq!(candidate.parts.version, 2);
    }

    #[test]
    fn test_tie_broken_by_file_name() {
        let index = catalog(&["Amber 2 Star 2023", "Amber 2 Star 2024"]);
        let outcome = DesignMatcher::default().classify("Amber Star 2025", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsUpdate);
        assert_eq!(matched_stem(&outcome).as_deref(), Some("Amber 2 Star 2023"));
    }

    #[test]
    fn test_exact_beats_fuzzy() {
        let index = catalog(&["Amber Ms Flk 2024", "Amber 4 Ms Flk 2023"]);
        let outcome = DesignMatcher::default().classify("Amber Ms Flk 2024", &index);
        assert_eq!(outcome.status, MatchStatus::Exists);
        assert_eq!(matched_stem(&outcome).as_deref(), Some("Amber Ms Flk 2024"));
        assert!(outcome.diff_description().is_none());
    }

    #[test]
    fn test_exact_folds_case_space_and_flake() {
        let index = catalog(&["amber  ms flake 2024"]);
        let outcome = DesignMatcher::default().classify("Amber Ms Flk 2024", &index);
        assert_eq!(outcome.status, MatchStatus::Exists);
    }

    #[test]
    fn test_needs_update_on_year() {
        let index = catalog(&["Amber Ms Flk 2024"]);
        let outcome = DesignMatcher::default().classify("Amber Ms Flk 2025", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsUpdate);
        assert_eq!(matched_stem(&outcome).as_deref(), Some("Amber Ms Flk 2024"));
        assert_eq!(outcome.diff_description().as_deref(), Some("Year: 2024 → 2025"));
    }

    #[test]
    fn test_needs_update_adds_or_drops_year() {
        let index = catalog(&["Zoe Ms Star"]);
        let outcome = DesignMatcher::default().classify("Zoe Ms Star 2025", &index);
        assert_eq!(outcome.diff_description().as_deref(), Some("Year: No Year → 2025"));

        let index = catalog(&["Zoe Ms Star 2023"]);
        let outcome = DesignMatcher::default().classify("Zoe Ms Star", &index);
        assert_eq!(outcome.diff_description().as_deref(), Some("Year: 2023 → No Year"));
    }

    #[test]
    fn test_higher_version_same_year_exists() {
        let index = catalog(&["Steve 2 Star"]);
        let outcome = DesignMatcher::default().classify("Steve Star", &index);
        assert_eq!(outcome.status, MatchStatus::Exists);
        assert_eq!(matched_stem(&outcome).as_deref(), Some("Steve 2 Star"));
    }

    #[test]
    fn test_no_match_on_empty_catalog() {
        let outcome = DesignMatcher::default().classify("Zyzzx Ms Star", &CatalogIndex::new());
        assert_eq!(outcome.status, MatchStatus::NeedsMade);
        assert!(outcome.matched_file.is_none());
        assert!(outcome.diff_description().is_none());
    }

    #[test]
    fn test_center_change_is_new_design_by_default() {
        let index = catalog(&["Amber Ms Star 2024"]);
        let outcome = DesignMatcher::default().classify("Amber Ms Flk 2024", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsMade);
    }

    #[test]
    fn test_center_change_as_update() {
        let index = catalog(&["Amber Ms Star 2024"]);
        let matcher = DesignMatcher::new(CenterChangePolicy::Update);
        let outcome = matcher.classify("Amber Ms Flk 2025", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsUpdate);
        assert_eq!(
            outcome.diff_description().as_deref(),
            Some("Center: Star → Flk | Year: 2024 → 2025")
        );
        assert_eq!(outcome.changes.len(), 2);
    }

    #[test]
    fn test_multiselect_never_matches_single_select() {
        let index = catalog(&["Amber Star 2024"]);
        let outcome = DesignMatcher::new(CenterChangePolicy::Update).classify("Amber Ms Star 2024", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsMade);
    }

    #[test]
    fn test_empty_target_is_needs_made() {
        let index = catalog(&["Amber Star"]);
        let outcome = DesignMatcher::default().classify("", &index);
        assert_eq!(outcome.status, MatchStatus::NeedsMade);
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::NeedsUpdate).unwrap(),
            "\"needs_update\""
        );
        let policy: CenterChangePolicy = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(policy, CenterChangePolicy::Update);
    }
}
