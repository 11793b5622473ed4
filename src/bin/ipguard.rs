//! ipguard command line tool
//!
//! - `check`: build a guard from config + range table and decide addresses
//! - `lookup`: show the range and country an address resolves to

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ipguard::{ConnectionGuard, FileTableLoader, GuardConfig, TableLoader};

#[derive(Parser)]
#[command(name = "ipguard")]
#[command(author, version, about = "Country allow-listing for incoming connections")]
struct Cli {
    /// Range table CSV (IP2Location LITE DB1 layout)
    #[arg(short, long, global = true)]
    table: Option<PathBuf>,

    /// Data directory containing ip2location/IP2LOCATION-LITE-DB1.CSV
    #[arg(short = 'D', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether each address would be allowed to connect
    Check {
        /// Configuration file (.yml, .yaml or .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Addresses to check
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Show which range each address falls into
    Lookup {
        /// Addresses to look up
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut loader = FileTableLoader::new();
    if let Some(ref dir) = cli.data_dir {
        loader = loader.with_data_dir(dir);
    }
    if let Some(ref path) = cli.table {
        loader = loader.with_path(path);
    }

    match cli.command {
        Commands::Check { config, addresses } => run_check(&config, &loader, &addresses),
        Commands::Lookup { addresses } => run_lookup(&loader, &addresses),
    }
}

fn run_check(config: &Path, loader: &FileTableLoader, addresses: &[String]) -> ExitCode {
    let config = match GuardConfig::from_file(config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            return ExitCode::from(2);
        }
    };

    let guard = ConnectionGuard::from_config(&config, loader);

    let mut denied = false;
    for address in addresses {
        let verdict = guard.check(address);
        denied |= !verdict.is_allowed();
        println!("{} {}", address, verdict.decision);
    }

    if denied {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_lookup(loader: &FileTableLoader, addresses: &[String]) -> ExitCode {
    let table = match loader.load_table() {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "failed to load IP ranges");
            return ExitCode::from(2);
        }
    };

    for address in addresses {
        match table.lookup_str(address) {
            Some(range) => {
                let cidrs: Vec<String> = range.cidrs().iter().map(ToString::to_string).collect();
                println!(
                    "{} {} {}-{} [{}]",
                    address,
                    range.country_code(),
                    range.start(),
                    range.end(),
                    cidrs.join(", ")
                );
            }
            None => println!("{} -", address),
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "ipguard", "--table", "db.csv", "check", "--config", "config.yml", "1.2.3.4",
            "8.8.8.8",
        ])
        .unwrap();
        assert_eq!(cli.table, Some(PathBuf::from("db.csv")));
        assert!(!cli.debug);
        match cli.command {
            Commands::Check { config, addresses } => {
                assert_eq!(config, PathBuf::from("config.yml"));
                assert_eq!(addresses, vec!["1.2.3.4", "8.8.8.8"]);
            }
            Commands::Lookup { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_lookup_with_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["ipguard", "lookup", "-D", "/srv/data", "-d", "1.0.0.1"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/data")));
        assert!(cli.debug);
        match cli.command {
            Commands::Lookup { addresses } => assert_eq!(addresses, vec!["1.0.0.1"]),
            Commands::Check { .. } => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_check_requires_config_and_addresses() {
        assert!(Cli::try_parse_from(["ipguard", "check", "1.2.3.4"]).is_err());
        assert!(Cli::try_parse_from(["ipguard", "check", "--config", "c.yml"]).is_err());
        assert!(Cli::try_parse_from(["ipguard", "lookup"]).is_err());
    }
}
