//! Design filename generator
//!
//! Turns a line item's SKU and free-text customizations into the canonical
//! design filename:
//! - MS: `{Name} Ms {Star|Flk}[ {Year}]`
//! - RR: `{Name} {Star|Year}`

use std::collections::HashMap;

use ornament_core::{
    CenterType, DEFAULT_WORKFLOW_SKUS, DesignIdentifier, OrderLineItem, ProductFamily,
    normalize_for_filename,
};
use regex::Regex;
use std::sync::LazyLock;
use time::OffsetDateTime;
use tracing::{debug, warn};

// First standalone run of exactly four digits: "Flake w/2024" -> "2024"
static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{4})(?:\D|$)").expect("Invalid regex"));

/// Name used when the personalization is missing or blank.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Static SKU -> product family table.
#[derive(Debug, Clone)]
pub struct SkuTable {
    families: HashMap<String, ProductFamily>,
}

impl SkuTable {
    pub fn family(&self, sku: &str) -> Option<ProductFamily> {
        self.families.get(sku.trim()).copied()
    }
}

impl Default for SkuTable {
    fn default() -> Self {
        DEFAULT_WORKFLOW_SKUS
            .iter()
            .map(|(sku, family)| ((*sku).to_string(), *family))
            .collect()
    }
}

impl FromIterator<(String, ProductFamily)> for SkuTable {
    fn from_iter<T: IntoIterator<Item = (String, ProductFamily)>>(iter: T) -> Self {
        Self {
            families: iter.into_iter().collect(),
        }
    }
}

/// Customization field names the generator looks for. Each logical field
/// accepts several listing spellings; matching is case-insensitive and the
/// first name present wins.
#[derive(Debug, Clone)]
pub struct FieldNames {
    pub personalization: Vec<String>,
    pub center_piece: Vec<String>,
    /// Separate year choice some MS listings carry ("Year or No Year")
    pub year: Vec<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            personalization: vec!["Personalization".to_string()],
            center_piece: vec![
                "Choose the Center Piece".to_string(),
                "Center Piece".to_string(),
                "Current Year or Star Design".to_string(),
            ],
            year: vec!["Year or No Year".to_string()],
        }
    }
}

/// Case-insensitive view over a line item's customizations.
struct Customizations<'a> {
    values: HashMap<String, &'a str>,
}

impl<'a> Customizations<'a> {
    fn from_item(item: &'a OrderLineItem) -> Self {
        let values = item
            .customizations
            .iter()
            .map(|f| (f.name.trim().to_lowercase(), f.value.as_str()))
            .collect();
        Self { values }
    }

    fn get(&self, names: &[String]) -> Option<&'a str> {
        names
            .iter()
            .find_map(|name| self.values.get(&name.trim().to_lowercase()).copied())
    }
}

/// Generates canonical design filenames for workflow line items.
#[derive(Debug, Clone, Default)]
pub struct FilenameGenerator {
    skus: SkuTable,
    fields: FieldNames,
    fixed_year: Option<i32>,
}

impl FilenameGenerator {
    pub fn new(skus: SkuTable, fields: FieldNames) -> Self {
        Self {
            skus,
            fields,
            fixed_year: None,
        }
    }

    /// Resolve "current year" to `year` instead of the wall clock.
    pub fn with_fixed_year(mut self, year: i32) -> Self {
        self.fixed_year = Some(year);
        self
    }

    pub fn family(&self, sku: &str) -> Option<ProductFamily> {
        self.skus.family(sku)
    }

    /// Generate the design filename, or `None` for SKUs outside the
    /// workflow table.
    pub fn generate(&self, item: &OrderLineItem) -> Option<DesignIdentifier> {
        let year = self.fixed_year.unwrap_or_else(current_year);
        self.generate_with_year(item, year)
    }

    /// Same as [`generate`](Self::generate) with an explicit current year.
    pub fn generate_with_year(
        &self,
        item: &OrderLineItem,
        current_year: i32,
    ) -> Option<DesignIdentifier> {
        let Some(family) = self.skus.family(&item.sku) else {
            debug!("Unknown SKU: {}", item.sku);
            return None;
        };

        let customizations = Customizations::from_item(item);
        let name = person_name(customizations.get(&self.fields.personalization));
        let center_raw = customizations.get(&self.fields.center_piece);
        if center_raw.is_none() {
            warn!(
                "No center piece choice on {} for {}; defaulting to Star",
                item.sku, name
            );
        }
        let center_value = center_raw.unwrap_or_default().to_lowercase();

        let identifier = match family {
            ProductFamily::Ms => {
                let design = if center_value.contains("flake") || center_value.contains("flk") {
                    CenterType::Flk
                } else {
                    CenterType::Star
                };
                let year = resolve_year(&center_value, current_year)
                    .or_else(|| {
                        customizations
                            .get(&self.fields.year)
                            .and_then(|raw| resolve_year_choice(raw, current_year))
                    })
                    .unwrap_or_default();
                compose(family, &name, design.as_token(), &year)
            }
            ProductFamily::Rr => {
                let token = if center_value.contains("current year") {
                    current_year.to_string()
                } else if center_value.contains("star") {
                    CenterType::Star.as_token().to_string()
                } else if let Some(year) = find_year(&center_value) {
                    year
                } else {
                    CenterType::Star.as_token().to_string()
                };
                compose(family, &name, &token, "")
            }
        };

        debug!("Generated {} filename: {}", family, identifier);
        Some(identifier)
    }
}

/// Compose a filename from already-normalized parts. For MS the year
/// segment is omitted entirely when empty; RR takes its center/year token
/// as `design` and ignores `year`.
pub fn compose(family: ProductFamily, name: &str, design: &str, year: &str) -> DesignIdentifier {
    match family {
        ProductFamily::Ms if year.is_empty() => DesignIdentifier::new(format!("{name} Ms {design}")),
        ProductFamily::Ms => DesignIdentifier::new(format!("{name} Ms {design} {year}")),
        ProductFamily::Rr => DesignIdentifier::new(format!("{name} {design}")),
    }
}

/// Wall-clock year of the run, local time when the offset is known.
pub fn current_year() -> i32 {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .year()
}

/// Filename-safe person name; [`UNKNOWN_NAME`] when the raw value is
/// missing or normalizes to nothing ("...", "!!").
pub(crate) fn person_name(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_NAME);
    let name = normalize_for_filename(raw);
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name
    }
}

/// "current year" -> the run year; otherwise the first four-digit year.
fn resolve_year(value: &str, current_year: i32) -> Option<String> {
    if value.to_lowercase().contains("current year") {
        return Some(current_year.to_string());
    }
    find_year(value)
}

/// A dedicated year choice: "No Year" means none.
fn resolve_year_choice(value: &str, current_year: i32) -> Option<String> {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() || lower == "no year" {
        return None;
    }
    resolve_year(&lower, current_year)
}

fn find_year(value: &str) -> Option<String> {
    YEAR_REGEX.captures(value).map(|cap| cap[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ornament_core::CustomizationField;

    fn item(sku: &str, fields: &[(&str, &str)]) -> OrderLineItem {
        OrderLineItem::new(
            sku,
            fields
                .iter()
                .map(|(n, v)| CustomizationField::new(*n, *v))
                .collect(),
        )
    }

    fn generate(sku: &str, fields: &[(&str, &str)]) -> Option<String> {
        FilenameGenerator::default()
            .generate_with_year(&item(sku, fields), 2025)
            .map(DesignIdentifier::into_inner)
    }

    #[test]
    fn test_ms_flake_with_year() {
        let name = generate(
            "PerSnoFlkOrn-MS-01",
            &[
                ("Personalization", "katie"),
                ("Choose the Center Piece", "Flake w/2024"),
            ],
        );
        // single-case names are title-cased
        assert_eq!(name.as_deref(), Some("Katie Ms Flk 2024"));
    }

    #[test]
    fn test_ms_current_year() {
        let name = generate(
            "PerSnoFlkOrn-MS-02",
            &[
                ("Personalization", "AMBER"),
                ("Choose the Center Piece", "Flake w/Current Year"),
            ],
        );
        assert_eq!(name.as_deref(), Some("Amber Ms Flk 2025"));
    }

    #[test]
    fn test_ms_star_without_year_omits_segment() {
        let name = generate(
            "PerSnoFlkOrn-MS-01",
            &[("Personalization", "Zoe"), ("Choose the Center Piece", "Star")],
        );
        assert_eq!(name.as_deref(), Some("Zoe Ms Star"));
    }

    #[test]
    fn test_ms_current_year_only_is_star() {
        let name = generate(
            "PerSnoFlkOrn-MS-01",
            &[("Personalization", "Zoe"), ("Center Piece", "Current Year")],
        );
        assert_eq!(name.as_deref(), Some("Zoe Ms Star 2025"));
    }

    #[test]
    fn test_ms_separate_year_field() {
        let with_year = generate(
            "PerSnoFlkOrn-MS-01",
            &[
                ("Personalization", "Zoe"),
                ("Choose the Center Piece", "Flake"),
                ("Year or No Year", "Current Year"),
            ],
        );
        assert_eq!(with_year.as_deref(), Some("Zoe Ms Flk 2025"));

        let no_year = generate(
            "PerSnoFlkOrn-MS-01",
            &[
                ("Personalization", "Zoe"),
                ("Choose the Center Piece", "Flake"),
                ("Year or No Year", "No Year"),
            ],
        );
        assert_eq!(no_year.as_deref(), Some("Zoe Ms Flk"));
    }

    #[test]
    fn test_rr_current_year() {
        let name = generate(
            "PerSnoFlkOrn-RR-03",
            &[
                ("Personalization", "JOHN"),
                ("Current Year or Star Design", "Current Year"),
            ],
        );
        assert_eq!(name.as_deref(), Some("John 2025"));
    }

    #[test]
    fn test_rr_star_and_explicit_year() {
        let star = generate(
            "PerSnoFlkOrn-RR-01",
            &[
                ("Personalization", "Lily Mae"),
                ("Current Year or Star Design", "Star Design"),
            ],
        );
        assert_eq!(star.as_deref(), Some("LilyMae Star"));

        let year = generate(
            "PerSnoFlkOrn-RR-01",
            &[("Personalization", "Lily Mae"), ("Center Piece", "2023")],
        );
        assert_eq!(year.as_deref(), Some("LilyMae 2023"));
    }

    #[test]
    fn test_rr_missing_center_defaults_to_star() {
        let name = generate("PerSnoFlkOrn-RR-02", &[("Personalization", "McCarthy")]);
        assert_eq!(name.as_deref(), Some("McCarthy Star"));
    }

    #[test]
    fn test_ms_missing_center_defaults_to_star() {
        let name = generate("PerSnoFlkOrn-MS-01", &[("Personalization", "McCarthy")]);
        assert_eq!(name.as_deref(), Some("McCarthy Ms Star"));
    }

    #[test]
    fn test_field_names_case_insensitive() {
        let name = generate(
            "PerSnoFlkOrn-MS-01",
            &[
                ("PERSONALIZATION", "katie"),
                ("choose the center piece", "flake w/2024"),
            ],
        );
        assert_eq!(name.as_deref(), Some("Katie Ms Flk 2024"));
    }

    #[test]
    fn test_missing_personalization_is_unknown() {
        let missing = generate("PerSnoFlkOrn-RR-01", &[("Center Piece", "Star")]);
        assert_eq!(missing.as_deref(), Some("Unknown Star"));

        let punctuation = generate(
            "PerSnoFlkOrn-RR-01",
            &[("Personalization", "..."), ("Center Piece", "Star")],
        );
        assert_eq!(punctuation.as_deref(), Some("Unknown Star"));
    }

    #[test]
    fn test_person_name_fallback() {
        assert_eq!(person_name(Some("lily mae")), "LilyMae");
        assert_eq!(person_name(Some("...")), UNKNOWN_NAME);
        assert_eq!(person_name(Some("  ")), UNKNOWN_NAME);
        assert_eq!(person_name(None), UNKNOWN_NAME);
    }

    #[test]
    fn test_current_year_follows_clock() {
        let name = FilenameGenerator::default()
            .generate(&item(
                "PerSnoFlkOrn-RR-01",
                &[("Personalization", "Ann"), ("Center Piece", "Current Year")],
            ))
            .map(DesignIdentifier::into_inner)
            .unwrap();

        // local and UTC can straddle New Year
        let year = OffsetDateTime::now_utc().year();
        let accepted = [year - 1, year, year + 1].map(|y| format!("Ann {y}"));
        assert!(accepted.contains(&name), "unexpected year in {name}");
    }

    #[test]
    fn test_unknown_sku() {
        assert_eq!(generate("CandyHeartEarring-Studs-01", &[]), None);
    }

    #[test]
    fn test_fixed_year_override() {
        let generator = FilenameGenerator::default().with_fixed_year(2031);
        let name = generator.generate(&item(
            "PerSnoFlkOrn-RR-01",
            &[("Personalization", "Ann"), ("Center Piece", "Current Year")],
        ));
        assert_eq!(name.map(DesignIdentifier::into_inner).as_deref(), Some("Ann 2031"));
    }

    #[test]
    fn test_custom_sku_table() {
        let skus: SkuTable = [("Custom-MS".to_string(), ProductFamily::Ms)]
            .into_iter()
            .collect();
        let generator = FilenameGenerator::new(skus, FieldNames::default());
        assert_eq!(generator.family("Custom-MS"), Some(ProductFamily::Ms));
        assert_eq!(generator.family("PerSnoFlkOrn-MS-01"), None);
    }

    #[test]
    fn test_find_year() {
        assert_eq!(find_year("flake w/2024").as_deref(), Some("2024"));
        assert_eq!(find_year("2023").as_deref(), Some("2023"));
        assert_eq!(find_year("star 20245"), None);
        assert_eq!(find_year("star"), None);
    }
}
