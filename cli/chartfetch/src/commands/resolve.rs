//! `chartfetch resolve`: fetch a chart by coordinates and summarize it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chartfetch_chart::Chart;
use chartfetch_maven::{
    ChartResolver, FileRepositorySystem, LocalRepository, RepositorySession, RepositorySystem,
};

use crate::commands::{ChartSummary, OutputFormat};
use crate::config::{parse_remote_arg, ChartfetchConfig};

/// Command-line settings for one resolution. Flags win over the config file.
#[derive(Debug, Default)]
pub struct ResolveOptions<'a> {
    pub coordinates: &'a str,
    pub version: Option<&'a str>,
    pub local_repository: Option<&'a Path>,
    pub remotes: &'a [String],
    pub offline: bool,
}

/// Build a resolver from config and flags, then resolve the chart.
pub fn resolve_chart(config: Option<&ChartfetchConfig>, options: &ResolveOptions<'_>) -> Result<Chart> {
    let default_config = ChartfetchConfig::default();
    let config = config.unwrap_or(&default_config);
    let system = FileRepositorySystem::new();

    let local = match options.local_repository.map(Path::to_path_buf).or_else(|| config.local_repository.clone()) {
        Some(path) => LocalRepository::new(path),
        None => LocalRepository::default_location()
            .context("no local repository configured and HOME is not set; pass --local-repo")?,
    };

    let mut session = RepositorySession::new();
    session
        .set_offline(options.offline || config.offline)
        .set_mirror_selector(config.mirror_selector());
    if let Some(policy) = config.checksum_policy {
        session.set_checksum_policy(policy);
    }
    let manager = system
        .new_local_repository_manager(&session, &local)
        .with_context(|| format!("opening local repository {}", local.basedir().display()))?;
    session.set_local_repository_manager(manager);

    let mut configured = config.remote_repositories();
    for arg in options.remotes {
        configured.push(parse_remote_arg(arg)?);
    }
    let remotes = system.new_resolution_repositories(&session, &configured);
    tracing::info!(
        local = %local.basedir().display(),
        remotes = remotes.len(),
        offline = session.is_offline(),
        "resolving {}",
        options.coordinates
    );

    let resolver = ChartResolver::new(Arc::new(system), Arc::new(session), remotes);
    let chart = resolver
        .resolve_coordinates(options.coordinates, options.version)
        .with_context(|| format!("resolving {}", options.coordinates))?;
    Ok(chart)
}

/// Run `chartfetch resolve`.
pub fn run(
    cwd: &Path,
    config_path: Option<&Path>,
    options: &ResolveOptions<'_>,
    format: Option<&str>,
) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let config = load_config(cwd, config_path)?;
    let chart = resolve_chart(config.as_ref(), options)?;
    print!("{}", ChartSummary::of(&chart).render(format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// An explicit `--config` must exist; otherwise search upward from `cwd`.
fn load_config(cwd: &Path, config_path: Option<&Path>) -> Result<Option<ChartfetchConfig>> {
    match config_path {
        Some(path) => Ok(Some(ChartfetchConfig::load(path)?)),
        None => Ok(ChartfetchConfig::find_and_load(cwd)?.map(|(config, _)| config)),
    }
}
