use std::sync::Arc;

use rewind_core::{SnapshotSource, TradingDate};

use crate::cli::{Cli, SnapshotArgs};
use crate::error::CliError;

use super::{build_controller, controller_config};

pub async fn run(
    cli: &Cli,
    args: &SnapshotArgs,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), CliError> {
    let date = TradingDate::parse(&args.date)?;
    let config = controller_config(&args.range, rewind_core::PlaybackSpeed::DEFAULT_MILLIS)?;
    let mut controller = build_controller(cli, config, source)?;

    let transition = controller.go_to_date(date);
    controller.settle().await;

    if controller.status().displayed_date != Some(transition.date) {
        return Err(CliError::NothingDisplayed {
            date: transition.date,
        });
    }
    Ok(())
}
