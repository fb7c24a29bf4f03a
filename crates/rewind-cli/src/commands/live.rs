use std::sync::Arc;

use rewind_core::{LiveDashboard, SnapshotSource, Symbol, Timeframe, REFRESH_INTERVAL};
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::cli::{Cli, LiveArgs};
use crate::error::CliError;
use crate::output::TerminalPresenter;

pub async fn run(
    cli: &Cli,
    args: &LiveArgs,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let timeframe = args.timeframe.parse::<Timeframe>()?;
    let dashboard = LiveDashboard::new(source, symbol, timeframe);
    let mut presenter = TerminalPresenter::stdout(cli.format, cli.pretty);

    if !args.watch {
        return Ok(dashboard.refresh(&mut presenter).await?);
    }

    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Failures were already reported; the next round retries.
                let _ = dashboard.refresh(&mut presenter).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("live refresh interrupted");
                return Ok(());
            }
        }
    }
}
