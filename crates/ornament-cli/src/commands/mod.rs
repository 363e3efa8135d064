pub mod catalog;
pub mod check;
pub mod generate;
pub mod names;

use std::path::Path;

use anyhow::Result;
use ornament_config::Config;
use ornament_engine::{DesignMatcher, FieldNames, FilenameGenerator, SkuTable};
use ornament_sources::{CatalogIndex, CatalogOptions, ExcludeList};
use tracing::debug;

/// Explicit `--config` file, or the default location (created on first use).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => {
            debug!("Using config {}", Config::config_path().display());
            Config::load()
        }
    }
}

/// Scan every configured catalog directory once for this run.
pub fn build_catalog(config: &Config) -> CatalogIndex {
    let options = CatalogOptions::new(config.catalog.roots(), config.catalog.extension.clone())
        .with_exclude(ExcludeList::new(&config.catalog.exclude));
    CatalogIndex::build(&options)
}

pub fn build_generator(config: &Config, year: Option<i32>) -> FilenameGenerator {
    let skus: SkuTable = config
        .skus
        .iter()
        .map(|(sku, family)| (sku.clone(), *family))
        .collect();
    let fields = FieldNames {
        personalization: config.fields.personalization.clone(),
        center_piece: config.fields.center_piece.clone(),
        year: config.fields.year.clone(),
    };

    let generator = FilenameGenerator::new(skus, fields);
    match year {
        Some(year) => generator.with_fixed_year(year),
        None => generator,
    }
}

pub fn build_matcher(config: &Config) -> DesignMatcher {
    DesignMatcher::new(config.matching.center_change)
}
