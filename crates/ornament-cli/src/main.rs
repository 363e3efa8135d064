mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so JSON on stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Check {
            orders,
            days,
            all_statuses,
            year,
            state,
            format,
        } => commands::check::handle(
            &config,
            &commands::check::CheckArgs {
                orders,
                days,
                all_statuses,
                year,
                state,
            },
            &format,
        ),
        cli::Commands::Names {
            input,
            family,
            center,
            format,
        } => commands::names::handle(&config, &input, family, center, &format),
        cli::Commands::Catalog { lookup } => commands::catalog::handle(&config, lookup.as_deref()),
        cli::Commands::Generate { sku, fields, year } => {
            commands::generate::handle(&config, &sku, &fields, year)
        }
    }
}
