//! `portal` entry-point: loads settings, wires adapters, and dispatches the
//! parsed command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use portal::PortalSettings;
use portal::inbound::cli::{Cli, CliContext, run};
use portal::outbound::http::HttpPortalApi;
use portal::outbound::session::FileSessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = PortalSettings::load_from_iter([OsString::from("portal")])
        .map_err(|err| eyre!("load portal settings: {err}"))?;

    let api_url = match cli.api_url.as_deref() {
        Some(raw) => Url::parse(raw).wrap_err_with(|| format!("invalid --api-url '{raw}'"))?,
        None => settings.api_url().wrap_err("invalid PORTAL_API_URL")?,
    };
    let session_file = cli
        .session_file
        .as_deref()
        .map_or_else(|| settings.session_file(), Utf8PathBuf::from);

    let api = HttpPortalApi::new(api_url, settings.request_timeout())
        .wrap_err("build HTTP client")?;
    let sessions = FileSessionStore::open(&session_file)
        .wrap_err_with(|| format!("open session file {session_file}"))?;
    let ctx = CliContext::new(Arc::new(api), Arc::new(sessions), settings.expiry_policy());

    let mut stdout = io::stdout().lock();
    run(cli.command, &ctx, &mut stdout).await?;
    Ok(())
}
