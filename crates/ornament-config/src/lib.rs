use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ornament_core::{CenterChangePolicy, DEFAULT_WORKFLOW_SKUS, ProductFamily};
use serde::{Deserialize, Serialize};

/// Configuration for ornament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub fields: FieldsConfig,

    #[serde(default)]
    pub orders: OrdersConfig,

    /// SKU -> product family
    #[serde(default = "default_skus")]
    pub skus: BTreeMap<String, ProductFamily>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base folder of the design database (default:
    /// `~/Snowflake_Database/Snowflake_Designs`)
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Scanned directories, relative to `root` unless absolute
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// Design file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Glob patterns matched against full file paths
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub center_change: CenterChangePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    #[serde(default = "default_personalization_fields")]
    pub personalization: Vec<String>,

    #[serde(default = "default_center_piece_fields")]
    pub center_piece: Vec<String>,

    #[serde(default = "default_year_fields")]
    pub year: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Anything not completed
    #[default]
    Open,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Look-back window for `check`, in days
    #[serde(default = "default_days_back")]
    pub days_back: i64,

    #[serde(default)]
    pub status: OrderStatus,

    /// Receipt IDs pulled by the last `check` run; orders not listed are
    /// reported as new. Tracking is off when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            matching: MatchingConfig::default(),
            fields: FieldsConfig::default(),
            orders: OrdersConfig::default(),
            skus: default_skus(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            directories: default_directories(),
            extension: default_extension(),
            exclude: Vec::new(),
        }
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            personalization: default_personalization_fields(),
            center_piece: default_center_piece_fields(),
            year: default_year_fields(),
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            days_back: default_days_back(),
            status: OrderStatus::default(),
            state_file: None,
        }
    }
}

impl CatalogConfig {
    /// Directories to scan: `root` joined with each relative entry.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.directories
            .iter()
            .map(|dir| {
                let dir = Path::new(dir);
                if dir.is_absolute() {
                    dir.to_path_buf()
                } else {
                    self.root.join(dir)
                }
            })
            .collect()
    }
}

fn default_root() -> PathBuf {
    let relative = Path::new("Snowflake_Database").join("Snowflake_Designs");
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(relative),
        None => relative,
    }
}

// 2021 and 2022 are deliberately left out as too old to be relevant
fn default_directories() -> Vec<String> {
    vec![
        "2023 Snowflakes".to_string(),
        "2024 Snowflakes".to_string(),
        "2025 Snowflakes".to_string(),
        "Snowflake SVGs".to_string(),
    ]
}

fn default_extension() -> String {
    "svg".to_string()
}

fn default_personalization_fields() -> Vec<String> {
    vec!["Personalization".to_string()]
}

fn default_center_piece_fields() -> Vec<String> {
    vec![
        "Choose the Center Piece".to_string(),
        "Center Piece".to_string(),
        "Current Year or Star Design".to_string(),
    ]
}

fn default_year_fields() -> Vec<String> {
    vec!["Year or No Year".to_string()]
}

fn default_days_back() -> i64 {
    90
}

fn default_skus() -> BTreeMap<String, ProductFamily> {
    DEFAULT_WORKFLOW_SKUS
        .iter()
        .map(|(sku, family)| ((*sku).to_string(), *family))
        .collect()
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "ornament", "ornament") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.ornament/config.toml")
        }
    }
}
