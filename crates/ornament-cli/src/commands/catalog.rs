//! Catalog command - scan summary and ad-hoc lookups

use anyhow::Result;
use ornament_config::Config;
use ornament_core::parse;

use super::{build_catalog, build_matcher};

pub fn handle(config: &Config, lookup: Option<&str>) -> Result<()> {
    let catalog = build_catalog(config);

    for root in catalog.roots() {
        if root.missing {
            println!("{} (missing)", root.root.display());
        } else {
            println!("{}: {} files", root.root.display(), root.files);
        }
    }
    println!("Total: {} designs", catalog.len());

    let Some(target) = lookup else {
        return Ok(());
    };

    let matcher = build_matcher(config);
    println!("\nLookup: {target}");

    match catalog.lookup_exact(target) {
        Some(file) => println!("  exact:      {}", file.path.display()),
        None => println!("  exact:      none"),
    }
    match matcher.exact_match(target, &catalog) {
        Some(file) => println!("  normalized: {}", file.path.display()),
        None => println!("  normalized: none"),
    }

    let wanted = parse(target);
    let candidates = matcher.candidates(&wanted, &catalog);
    if candidates.is_empty() {
        println!("  family:     none");
    } else {
        for candidate in candidates.iter().take(5) {
            println!(
                "  family:     {} (version {})",
                candidate.file.path.display(),
                candidate.parts.version
            );
        }
    }

    let outcome = matcher.classify(target, &catalog);
    match outcome.diff_description() {
        Some(diff) => println!("  status:     {} ({})", outcome.status, diff),
        None => println!("  status:     {}", outcome.status),
    }

    Ok(())
}
