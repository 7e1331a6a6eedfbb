#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front-end for the back-office tooling.
//!
//! Runs the extraction layer over saved HTML responses (or stdin), resolves
//! voucher reprocess payloads, queries an upstream endpoint directly, and
//! starts the pass-through proxy.

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "idss", about = "Back-office HTML extraction and proxy tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for extracted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON
    Json,
    /// Plain-text tables
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables from an HTML response
    Extract {
        /// Built-in profile name (account, voucher, verification)
        #[arg(long, default_value = "account", conflicts_with = "profile_file")]
        profile: String,
        /// Path to a TOML profile definition
        #[arg(long)]
        profile_file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// HTML file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Resolve the voucher reprocess payload from a voucher search response
    Voucher {
        /// Send the payload to the reprocess API instead of printing it
        #[arg(long)]
        send: bool,
        /// HTML file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Extract label/value pairs from a detail response
    Record {
        /// Preferred table selector (e.g. `table#service1`)
        #[arg(long)]
        selector: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// HTML file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Interpret a disconnect response
    Status {
        /// Account the disconnect was issued for
        #[arg(long, default_value = "")]
        account: String,
        /// Response file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Query an upstream endpoint directly and print its extraction
    Lookup {
        /// Endpoint id (e.g. `search-vouchers`, `account-info`)
        endpoint: String,
        /// Search value (account number, voucher code, reference number)
        query: String,
    },
    /// List built-in extraction profiles
    Profiles,
    /// List registered upstream endpoints
    Endpoints,
    /// Start the pass-through proxy server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            profile,
            profile_file,
            format,
            file,
        } => commands::extract(&profile, profile_file.as_deref(), format, file.as_deref())?,
        Commands::Voucher { send, file } => commands::voucher(send, file.as_deref()).await?,
        Commands::Record {
            selector,
            format,
            file,
        } => commands::record(selector.as_deref(), format, file.as_deref())?,
        Commands::Status { account, file } => commands::status(&account, file.as_deref())?,
        Commands::Lookup { endpoint, query } => commands::lookup(&endpoint, &query).await?,
        Commands::Profiles => commands::profiles(),
        Commands::Endpoints => commands::endpoints(),
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            let config = idss_proxy::config::ProxyConfig::from_env();
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(idss_proxy::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}
