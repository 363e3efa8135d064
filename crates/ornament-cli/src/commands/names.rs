//! Names command - check a bare list of names against the catalog

use std::io::Read;

use anyhow::{Context, Result, bail};
use ornament_config::Config;
use ornament_core::{CenterType, ProductFamily};
use ornament_engine::{MatchStatus, OrderCategorizer};

use super::{build_catalog, build_generator, build_matcher};

pub fn handle(
    config: &Config,
    input: &str,
    family: ProductFamily,
    center: CenterType,
    format: &str,
) -> Result<()> {
    if center == CenterType::None {
        bail!("--center must be star or flk");
    }

    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read names from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };
    let names: Vec<&str> = content.lines().collect();

    let catalog = build_catalog(config);
    let generator = build_generator(config, None);
    let matcher = build_matcher(config);
    let results =
        OrderCategorizer::new(&generator, &matcher, &catalog).check_names(&names, family, center);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        _ => {
            for status in [MatchStatus::NeedsMade, MatchStatus::NeedsUpdate, MatchStatus::Exists] {
                let matching: Vec<_> = results.iter().filter(|r| r.status == status).collect();
                println!("{} ({})", status.label(), matching.len());
                for result in matching {
                    let mut line = format!("  {} -> {}", result.original_name, result.design_identifier);
                    if let Some(file) = &result.matched_file {
                        line.push_str(&format!(" [{}]", file.stem()));
                    }
                    if let Some(diff) = &result.diff {
                        line.push_str(&format!(" ({diff})"));
                    }
                    if let Some(days) = result.days_since_modified {
                        line.push_str(&format!(" modified {days}d ago"));
                    }
                    println!("{line}");
                }
                println!();
            }
        }
    }

    Ok(())
}
