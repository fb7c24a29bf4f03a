use std::sync::Arc;

use rewind_core::{SnapshotSource, TradingDate};
use tracing::info;

use crate::cli::{Cli, ReplayArgs};
use crate::error::CliError;

use super::{build_controller, controller_config};

/// Shows `--from`, then plays one day per tick until today.
pub async fn run(
    cli: &Cli,
    args: &ReplayArgs,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), CliError> {
    let from = TradingDate::parse(&args.from)?;
    let config = controller_config(&args.range, args.speed_ms)?;
    let mut controller = build_controller(cli, config, source)?;

    controller.go_to_date(from);
    controller.settle().await;

    if controller.play() {
        while controller.is_playing() {
            controller.step().await;
        }
    }
    controller.settle().await;

    let status = controller.status();
    info!(reached = %status.current_date, "replay finished");
    if status.displayed_date.is_none() {
        return Err(CliError::NothingDisplayed {
            date: status.current_date,
        });
    }
    Ok(())
}
