use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ornament_core::{CenterType, ProductFamily};

#[derive(Parser)]
#[command(name = "ornament")]
#[command(about = "Match ornament orders against the design catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize orders from an export file
    Check {
        /// Order export (JSON array or {"results": [...]})
        #[arg(long)]
        orders: PathBuf,

        /// Look back this many days (default from config: 90)
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        days: Option<i64>,

        /// Include completed orders
        #[arg(long)]
        all_statuses: bool,

        /// Resolve "current year" to this year
        #[arg(long)]
        year: Option<i32>,

        /// Previous-run order IDs; read to mark orders new, then rewritten
        /// (default from config: [orders] state_file)
        #[arg(long)]
        state: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a plain list of names, one per line
    Names {
        /// Names file, or - for stdin
        input: String,

        /// Product family to compose (ms or rr)
        #[arg(long, default_value = "rr")]
        family: ProductFamily,

        /// Center piece (star or flk)
        #[arg(long, default_value = "star")]
        center: CenterType,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Scan the design catalog
    Catalog {
        /// Show exact and fuzzy matches for a design filename
        #[arg(long)]
        lookup: Option<String>,
    },

    /// Print the design filename for an ad-hoc line item
    Generate {
        #[arg(long)]
        sku: String,

        /// Customization as "Name=Value" (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Resolve "current year" to this year
        #[arg(long)]
        year: Option<i32>,
    },
}
