//! One-shot dispatch of a raw command.

use anyhow::{Context, Result};
use einvoice_b2b::command::{Command, RawCommand};
use einvoice_b2b::{EcPayClient, Response};
use tracing::{debug, info};

use crate::config::Config;

/// Send `data` to `path` for the configured merchant and print the decoded
/// reply to stdout.
///
/// Returns whether the vendor reported success.
///
/// # Errors
///
/// Returns an error if the client cannot be built, `data` is not a JSON
/// object, or the round trip fails before a reply could be decoded.
pub async fn run(cfg: &Config, path: &str, data: &str, pretty: bool) -> Result<bool> {
    let client =
        EcPayClient::new(&cfg.client_settings()).context("failed to build e-invoice client")?;
    let command =
        RawCommand::from_json(&cfg.merchant_id, path, data).context("invalid Data argument")?;

    debug!(server = client.base_url(), path = command.transport_path(), "dispatching");
    let response = client
        .send(&command)
        .await
        .with_context(|| format!("{} failed", command.transport_path()))?;
    info!(
        path = command.transport_path(),
        code = response.code(),
        success = response.is_success(),
        "reply decoded"
    );

    println!("{}", render(&response, pretty)?);
    Ok(response.is_success())
}

fn render(response: &Response, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    out.context("failed to serialise response")
}
