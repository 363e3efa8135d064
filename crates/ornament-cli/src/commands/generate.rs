//! Generate command - design filename for an ad-hoc line item

use anyhow::{Result, anyhow};
use ornament_config::Config;
use ornament_core::{CustomizationField, OrderLineItem};

use super::build_generator;

pub fn handle(config: &Config, sku: &str, fields: &[String], year: Option<i32>) -> Result<()> {
    let customizations = fields
        .iter()
        .map(|f| parse_field(f))
        .collect::<Result<Vec<_>>>()?;
    let item = OrderLineItem::new(sku, customizations);

    let generator = build_generator(config, year);
    let identifier = generator
        .generate(&item)
        .ok_or_else(|| anyhow!("SKU {sku} is not a workflow product"))?;

    println!("{identifier}");
    Ok(())
}

/// `"Name=Value"` -> customization field; the value may itself contain `=`.
fn parse_field(raw: &str) -> Result<CustomizationField> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected Name=Value, got {raw:?}"))?;
    Ok(CustomizationField::new(name.trim(), value.trim()))
}
