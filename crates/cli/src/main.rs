//! `einvoice-b2b` command entry point.
//!
//! Startup sequence:
//! 1. Parse the operation path and Data JSON from the command line.
//! 2. Load and validate [`Config`](config::Config) from environment variables.
//! 3. Initialise structured JSON logging.
//! 4. Send the request and print the decoded reply.

mod config;
mod dispatch;
mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "einvoice-b2b")]
#[command(about = "Send one ECPay B2B e-invoice request and print the decoded reply")]
#[command(version)]
struct Args {
    /// Operation path, e.g. /B2BInvoice/GetIssue
    path: String,

    /// Data object as JSON; MerchantID is filled in from the environment
    #[arg(default_value = "{}")]
    data: String,

    /// Pretty-print the reply
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: einvoice-b2b configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Dispatch
    // -----------------------------------------------------------------------
    let success = dispatch::run(&cfg, &args.path, &args.data, args.pretty).await?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
