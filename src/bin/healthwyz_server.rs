//!
//! healthwyz server binary
//! -----------------------
//! Command-line entry point for starting the healthwyz authentication HTTP
//! server. Supports configuration via CLI flags and environment variables:
//! `--http-port` / `HEALTHWYZ_HTTP_PORT` and `--fixtures` /
//! `HEALTHWYZ_FIXTURES` (path to a JSON identity fixture file; the built-in
//! demo directory is used when unset).

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn parse_port_env(name: &str) -> Option<u16> {
    match env::var(name) {
        Ok(val) => val.parse::<u16>().ok(),
        Err(_) => None,
    }
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag
            && i + 1 < args.len() {
                return Some(args[i + 1].clone());
            }
        i += 1;
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().skip(1).collect();

    let http_port = parse_arg(&args, "--http-port")
        .and_then(|s| s.parse::<u16>().ok())
        .or_else(|| parse_port_env("HEALTHWYZ_HTTP_PORT"))
        .unwrap_or(7878);

    let fixtures: Option<PathBuf> = parse_arg(&args, "--fixtures")
        .or_else(|| env::var("HEALTHWYZ_FIXTURES").ok())
        .map(PathBuf::from);

    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "healthwyz",
        "healthwyz starting: RUST_LOG='{}', http_port={}, fixtures={:?}",
        rust_log, http_port, fixtures
    );

    healthwyz::server::run_with_port(http_port, fixtures.as_deref()).await
}
