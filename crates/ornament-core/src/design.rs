//! Design naming models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ornament centerpiece motif as it appears in design filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterType {
    Star,
    Flk,
    #[default]
    None,
}

impl CenterType {
    /// Token used when composing a filename.
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Star => "Star",
            Self::Flk => "Flk",
            Self::None => "None",
        }
    }
}

impl fmt::Display for CenterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for CenterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "star" => Ok(Self::Star),
            "flk" | "flake" => Ok(Self::Flk),
            "none" | "" => Ok(Self::None),
            other => Err(format!("invalid center type: {other}")),
        }
    }
}

/// Product variant family; each has its own filename grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductFamily {
    /// Multi-select: `{Name} Ms {Star|Flk}[ {Year}]`
    #[serde(rename = "MS")]
    Ms,
    /// Single-select: `{Name} {Star|Year}`
    #[serde(rename = "RR")]
    Rr,
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ms => write!(f, "MS"),
            Self::Rr => write!(f, "RR"),
        }
    }
}

impl FromStr for ProductFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ms" => Ok(Self::Ms),
            "rr" => Ok(Self::Rr),
            other => Err(format!("invalid product family: {other}")),
        }
    }
}

/// Workflow SKUs shipped as the default product table.
pub const DEFAULT_WORKFLOW_SKUS: &[(&str, ProductFamily)] = &[
    ("PerSnoFlkOrn-MS-01", ProductFamily::Ms),
    ("PerSnoFlkOrn-MS-02", ProductFamily::Ms),
    ("PerSnoFlkOrn-RR-01", ProductFamily::Rr),
    ("PerSnoFlkOrn-RR-02", ProductFamily::Rr),
    ("PerSnoFlkOrn-RR-03", ProductFamily::Rr),
    ("PerSnoFlkOrn-RR-04", ProductFamily::Rr),
    ("PerSnoFlkOrn-RR-05", ProductFamily::Rr),
    ("PerSnoFlkOrn-RR-06", ProductFamily::Rr),
];

/// Canonical design filename generated for an order line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignIdentifier(String);

impl DesignIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DesignIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DesignIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a differing center piece is treated when matching against the
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterChangePolicy {
    /// Center type is part of the design family; a new center is a new design
    #[default]
    NewDesign,
    /// Same name and multi-select flag is enough; a new center is an update
    Update,
}

/// Structured view of a design filename.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedDesignParts {
    pub base_name: String,
    pub is_multiselect: bool,
    pub center_type: CenterType,
    /// Four-digit year, or empty.
    pub year: String,
    /// 0 when the filename carries no version number.
    pub version: u32,
}

impl ParsedDesignParts {
    /// Family identity: base name, multi-select flag and center type.
    /// Year and version never participate.
    pub fn same_family(&self, other: &Self) -> bool {
        self.same_variant(other) && self.center_type == other.center_type
    }

    /// Base name and multi-select flag only.
    pub fn same_variant(&self, other: &Self) -> bool {
        self.base_name == other.base_name && self.is_multiselect == other.is_multiselect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(base: &str, ms: bool, center: CenterType, year: &str, version: u32) -> ParsedDesignParts {
        ParsedDesignParts {
            base_name: base.to_string(),
            is_multiselect: ms,
            center_type: center,
            year: year.to_string(),
            version,
        }
    }

    #[test]
    fn test_family_ignores_year_and_version() {
        let a = parts("amber", true, CenterType::Flk, "2024", 0);
        let b = parts("amber", true, CenterType::Flk, "2025", 3);
        assert!(a.same_family(&b));
    }

    #[test]
    fn test_family_includes_center_and_ms() {
        let a = parts("amber", true, CenterType::Flk, "", 0);
        assert!(!a.same_family(&parts("amber", true, CenterType::Star, "", 0)));
        assert!(!a.same_family(&parts("amber", false, CenterType::Flk, "", 0)));
        assert!(a.same_variant(&parts("amber", true, CenterType::Star, "", 0)));
    }

    #[test]
    fn test_product_family_parse() {
        assert_eq!("ms".parse::<ProductFamily>(), Ok(ProductFamily::Ms));
        assert_eq!(" RR ".parse::<ProductFamily>(), Ok(ProductFamily::Rr));
        assert!("xx".parse::<ProductFamily>().is_err());
    }

    #[test]
    fn test_product_family_serde() {
        let json = serde_json::to_string(&ProductFamily::Ms).unwrap();
        assert_eq!(json, "\"MS\"");
        let parsed: ProductFamily = serde_json::from_str("\"RR\"").unwrap();
        assert_eq!(parsed, ProductFamily::Rr);
    }

    #[test]
    fn test_center_type_parse() {
        assert_eq!("Flake".parse::<CenterType>(), Ok(CenterType::Flk));
        assert_eq!("STAR".parse::<CenterType>(), Ok(CenterType::Star));
    }
}
