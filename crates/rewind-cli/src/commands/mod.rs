mod live;
mod navigate;
mod replay;
mod snapshot;

use std::sync::Arc;

use rewind_core::{
    ControllerConfig, HttpSnapshotSource, HttpSourceConfig, NavigationController, PlaybackSpeed,
    ScriptedSource, SnapshotSource, Symbol, TradingDate,
};

use crate::cli::{Cli, Command, RangeArgs};
use crate::error::CliError;
use crate::output::TerminalPresenter;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let source = build_source(cli)?;

    match &cli.command {
        Command::Snapshot(args) => snapshot::run(cli, args, source).await,
        Command::Replay(args) => replay::run(cli, args, source).await,
        Command::Navigate(args) => navigate::run(cli, args, source).await,
        Command::Live(args) => live::run(cli, args, source).await,
    }
}

/// `--mock` selects offline data; otherwise the environment configures the
/// HTTP source and explicit flags override it.
fn build_source(cli: &Cli) -> Result<Arc<dyn SnapshotSource>, CliError> {
    if cli.mock {
        return Ok(Arc::new(ScriptedSource::new()));
    }

    let mut config = HttpSourceConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = HttpSourceConfig::new(base_url, config.timeout_ms)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(Arc::new(HttpSnapshotSource::new(config)))
}

fn controller_config(range: &RangeArgs, speed_ms: u64) -> Result<ControllerConfig, CliError> {
    Ok(ControllerConfig {
        min_date: TradingDate::parse(&range.min_date)?,
        speed: PlaybackSpeed::from_millis(speed_ms)?,
        chart_symbol: Symbol::parse(&range.chart_symbol)?,
    })
}

fn build_controller(
    cli: &Cli,
    config: ControllerConfig,
    source: Arc<dyn SnapshotSource>,
) -> Result<NavigationController, CliError> {
    let presenter = TerminalPresenter::stdout(cli.format, cli.pretty);
    Ok(NavigationController::starting_today(
        config,
        source,
        Box::new(presenter),
    )?)
}
