//! Live (non-historical) dashboard refresh.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::presenter::{execution_markers, ChartMarker, Presenter};
use crate::{
    AccountInfo, AccountSummary, Execution, Kline, Order, Position, SnapshotSource, SourceError,
    Symbol, Timeframe,
};

/// Period between automatic live refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Everything the live dashboard shows, fetched in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveView {
    pub account: AccountInfo,
    pub summary: AccountSummary,
    /// Bitcoin positions only.
    pub positions: Vec<Position>,
    pub pending_orders: Vec<Order>,
    pub executions: Vec<Execution>,
    pub klines: Vec<Kline>,
    pub markers: Vec<ChartMarker>,
}

pub struct LiveDashboard {
    source: Arc<dyn SnapshotSource>,
    symbol: Symbol,
    timeframe: Timeframe,
}

impl LiveDashboard {
    pub fn new(source: Arc<dyn SnapshotSource>, symbol: Symbol, timeframe: Timeframe) -> Self {
        Self {
            source,
            symbol,
            timeframe,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Fetches all live parts concurrently. The first failure wins.
    pub async fn fetch(&self) -> Result<LiveView, SourceError> {
        let (klines, pending_orders, executions, positions, account) = tokio::try_join!(
            self.source.klines(&self.symbol, self.timeframe),
            self.source.pending_orders(),
            self.source.executions(),
            self.source.positions(),
            self.source.account(),
        )?;

        let positions: Vec<Position> = positions.into_iter().filter(Position::is_bitcoin).collect();
        let summary = AccountSummary::from_positions(account.balance, &positions);
        let markers = execution_markers(&executions, &self.symbol);

        Ok(LiveView {
            account,
            summary,
            positions,
            pending_orders,
            executions,
            klines,
            markers,
        })
    }

    /// Fetches and renders. On failure one error is reported and nothing is
    /// rendered.
    pub async fn refresh(&self, presenter: &mut dyn Presenter) -> Result<(), SourceError> {
        match self.fetch().await {
            Ok(view) => {
                presenter.render_account(&view.summary);
                presenter.render_positions(&view.positions);
                presenter.render_orders(&view.pending_orders);
                presenter.render_executions(&view.executions);
                presenter.render_chart(&view.klines, &view.markers);
                Ok(())
            }
            Err(error) => {
                warn!(code = error.code(), "live refresh failed: {error}");
                presenter.report_error(&format!("failed to load dashboard data: {error}"));
                Err(error)
            }
        }
    }
}
