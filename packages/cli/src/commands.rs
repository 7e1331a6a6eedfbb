//! Subcommand implementations.

use std::io::Read as _;
use std::path::Path;

use idss_extract::key_value::extract_key_value;
use idss_extract::profile::{ExtractProfile, InclusionPolicy, all_builtin, require_builtin};
use idss_extract::status::disconnect_outcome;
use idss_extract::table::extract_tables;
use idss_extract::voucher::resolve_reprocess_request;
use idss_extract_models::ReprocessResponse;
use idss_proxy::config::ProxyConfig;
use idss_proxy::upstream::UpstreamClient;
use idss_proxy::{ProxyError, extraction};
use idss_proxy_models::registry::{all_endpoints, find_endpoint};
use idss_proxy_models::requests::payload_for;

use crate::Format;
use crate::render;

/// Reads the whole input: a file, or stdin when `file` is `None` or `-`.
///
/// Invalid UTF-8 is replaced rather than rejected; legacy pages are not
/// always consistent about their encoding.
fn read_input(file: Option<&Path>) -> std::io::Result<String> {
    let bytes = match file {
        Some(path) if path != Path::new("-") => std::fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn load_profile(
    name: &str,
    file: Option<&Path>,
) -> Result<ExtractProfile, Box<dyn std::error::Error>> {
    if let Some(path) = file {
        let source = std::fs::read_to_string(path)?;
        return Ok(ExtractProfile::from_toml_str(&source)?);
    }
    Ok(require_builtin(name)?)
}

/// `idss extract`
pub fn extract(
    profile: &str,
    profile_file: Option<&Path>,
    format: Format,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = load_profile(profile, profile_file)?;
    let html = read_input(file)?;
    let tables = extract_tables(&html, &profile);

    if tables.is_empty() {
        log::warn!("No tables found in the response");
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&tables)?),
        Format::Text => print!("{}", render::tables(&tables)),
    }
    Ok(())
}

/// `idss voucher`
pub async fn voucher(send: bool, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let html = read_input(file)?;
    let profile = require_builtin("voucher")?;
    let tables = extract_tables(&html, &profile);

    let request = resolve_reprocess_request(&tables)?;

    if !send {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let endpoint = find_endpoint("reprocess-voucher")
        .ok_or_else(|| ProxyError::UnknownEndpoint("reprocess-voucher".to_owned()))?;
    let client = UpstreamClient::new(ProxyConfig::from_env())?;
    let response = client.forward_json(&endpoint, &request).await?;

    if !response.is_success() {
        return Err(ProxyError::UpstreamStatus {
            status: response.status,
        }
        .into());
    }

    let result: ReprocessResponse = serde_json::from_str(&response.body)?;
    println!("{}", result.summary());
    Ok(())
}

/// `idss record`
pub fn record(
    selector: Option<&str>,
    format: Format,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let html = read_input(file)?;
    let record = extract_key_value(&html, selector)?;

    if record.is_empty() {
        log::warn!("No data could be extracted from the response");
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        Format::Text => print!("{}", render::record(&record)),
    }
    Ok(())
}

/// `idss status`
pub fn status(account: &str, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(file)?;
    println!("{}", disconnect_outcome(account, &text));
    Ok(())
}

/// `idss lookup`
pub async fn lookup(endpoint_id: &str, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = find_endpoint(endpoint_id)
        .ok_or_else(|| ProxyError::UnknownEndpoint(endpoint_id.to_owned()))?;
    let payload = payload_for(endpoint_id, query)
        .ok_or_else(|| format!("Endpoint '{endpoint_id}' does not take a search value"))?;

    let client = UpstreamClient::new(ProxyConfig::from_env())?;
    let response = client.forward_json(&endpoint, &payload).await?;

    if !response.is_success() {
        return Err(ProxyError::UpstreamStatus {
            status: response.status,
        }
        .into());
    }

    match extraction::apply(&endpoint.extraction, &response.body)? {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("{}", response.body),
    }
    Ok(())
}

/// `idss profiles`
pub fn profiles() {
    for profile in all_builtin() {
        println!(
            "{:<14} {:<13} {}",
            profile.name,
            match profile.inclusion {
                InclusionPolicy::Lenient => "lenient",
                InclusionPolicy::RequireRows => "require_rows",
            },
            profile.description.unwrap_or_default()
        );
    }
}

/// `idss endpoints`
pub fn endpoints() {
    for endpoint in all_endpoints() {
        let upstream: &str = endpoint.upstream.as_ref();
        println!(
            "{:<18} {:<7} {:<10} {}",
            endpoint.id,
            upstream,
            endpoint.extraction.kind(),
            endpoint.description
        );
    }
}
