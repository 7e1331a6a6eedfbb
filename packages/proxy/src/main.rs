#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Back-office proxy server binary.
//!
//! Reads its configuration from `BIND_ADDR`, `PORT`,
//! `IDSS_LEGACY_BASE_URL`, `IDSS_IBAS_BASE_URL`, and
//! `IDSS_UPSTREAM_TIMEOUT_SECS`.

use idss_proxy::config::ProxyConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    idss_proxy::run_server(ProxyConfig::from_env()).await
}
