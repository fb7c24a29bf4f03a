//! Push-only presentation boundary.
//!
//! The engine never reads back from presentation. Implementations render
//! whatever they are handed: a terminal table, a chart widget, or a
//! recording used by tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::{AccountSummary, Execution, Kline, Order, Position, Side, Snapshot, Symbol, TradingDate};

/// Marker placement relative to its candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

/// Trade marker drawn on the candlestick chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartMarker {
    pub time: i64,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub text: String,
}

impl ChartMarker {
    pub fn for_execution(execution: &Execution) -> Self {
        let (position, shape) = match execution.side {
            Side::Buy => (MarkerPosition::BelowBar, MarkerShape::ArrowUp),
            Side::Sell => (MarkerPosition::AboveBar, MarkerShape::ArrowDown),
        };
        Self {
            time: execution.timestamp_unix,
            position,
            shape,
            text: format!("{} {}", execution.side.as_str(), execution.qty),
        }
    }
}

/// Markers for the executions traded on `symbol`, in input order.
pub fn execution_markers(executions: &[Execution], symbol: &Symbol) -> Vec<ChartMarker> {
    executions
        .iter()
        .filter(|execution| execution.symbol == symbol.as_str())
        .map(ChartMarker::for_execution)
        .collect()
}

pub trait Presenter: Send {
    fn render_account(&mut self, summary: &AccountSummary);
    fn render_positions(&mut self, positions: &[Position]);
    fn render_orders(&mut self, orders: &[Order]);
    fn render_executions(&mut self, executions: &[Execution]);
    fn render_chart(&mut self, klines: &[Kline], markers: &[ChartMarker]);
    fn render_viewing_date(&mut self, date: TradingDate);
    fn set_historical_banner(&mut self, visible: bool, date: TradingDate);
    fn render_playback(&mut self, is_playing: bool);
    fn report_error(&mut self, message: &str);
}

/// Pushes every part of a snapshot to `presenter`.
pub fn present_snapshot(presenter: &mut dyn Presenter, snapshot: &Snapshot, chart_symbol: &Symbol) {
    presenter.render_account(&snapshot.account);
    presenter.render_positions(&snapshot.btc_positions);
    presenter.render_orders(&snapshot.today_orders);
    presenter.render_executions(&snapshot.recent_execs);
    let markers = execution_markers(&snapshot.recent_execs, chart_symbol);
    presenter.render_chart(&snapshot.kline_data, &markers);
}

/// One call received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Account(AccountSummary),
    Positions(Vec<Position>),
    Orders(Vec<Order>),
    Executions(Vec<Execution>),
    Chart {
        klines: Vec<Kline>,
        markers: Vec<ChartMarker>,
    },
    ViewingDate(TradingDate),
    HistoricalBanner {
        visible: bool,
        date: TradingDate,
    },
    Playback(bool),
    Error(String),
}

/// Presenter that records every call. Clones share one log, so a test can
/// keep a clone while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.log().clone()
    }

    /// Dates passed to `render_viewing_date`, oldest first.
    pub fn viewed_dates(&self) -> Vec<TradingDate> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::ViewingDate(date) => Some(*date),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_banner(&self) -> Option<(bool, TradingDate)> {
        self.log().iter().rev().find_map(|event| match event {
            PresenterEvent::HistoricalBanner { visible, date } => Some((*visible, *date)),
            _ => None,
        })
    }

    pub fn last_playback(&self) -> Option<bool> {
        self.log().iter().rev().find_map(|event| match event {
            PresenterEvent::Playback(playing) => Some(*playing),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<PresenterEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: PresenterEvent) {
        self.log().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn render_account(&mut self, summary: &AccountSummary) {
        self.push(PresenterEvent::Account(*summary));
    }

    fn render_positions(&mut self, positions: &[Position]) {
        self.push(PresenterEvent::Positions(positions.to_vec()));
    }

    fn render_orders(&mut self, orders: &[Order]) {
        self.push(PresenterEvent::Orders(orders.to_vec()));
    }

    fn render_executions(&mut self, executions: &[Execution]) {
        self.push(PresenterEvent::Executions(executions.to_vec()));
    }

    fn render_chart(&mut self, klines: &[Kline], markers: &[ChartMarker]) {
        self.push(PresenterEvent::Chart {
            klines: klines.to_vec(),
            markers: markers.to_vec(),
        });
    }

    fn render_viewing_date(&mut self, date: TradingDate) {
        self.push(PresenterEvent::ViewingDate(date));
    }

    fn set_historical_banner(&mut self, visible: bool, date: TradingDate) {
        self.push(PresenterEvent::HistoricalBanner { visible, date });
    }

    fn render_playback(&mut self, is_playing: bool) {
        self.push(PresenterEvent::Playback(is_playing));
    }

    fn report_error(&mut self, message: &str) {
        self.push(PresenterEvent::Error(message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution(symbol: &str, side: Side, qty: i64, at: i64) -> Execution {
        Execution {
            exec_id: format!("e-{at}"),
            order_id: format!("o-{at}"),
            symbol: symbol.to_owned(),
            side,
            price: 40_000.0,
            qty,
            commission: 0.0,
            timestamp: String::new(),
            timestamp_unix: at,
        }
    }

    #[test]
    fn markers_follow_trade_direction() {
        let executions = vec![
            execution("XBTUSD", Side::Buy, 100, 10),
            execution("ETHUSD", Side::Buy, 5, 20),
            execution("XBTUSD", Side::Sell, 250, 30),
        ];

        let markers = execution_markers(&executions, &Symbol::xbtusd());

        assert_eq!(
            markers,
            vec![
                ChartMarker {
                    time: 10,
                    position: MarkerPosition::BelowBar,
                    shape: MarkerShape::ArrowUp,
                    text: String::from("Buy 100"),
                },
                ChartMarker {
                    time: 30,
                    position: MarkerPosition::AboveBar,
                    shape: MarkerShape::ArrowDown,
                    text: String::from("Sell 250"),
                },
            ]
        );
    }

    #[test]
    fn marker_serializes_in_chart_vocabulary() {
        let marker = ChartMarker::for_execution(&execution("XBTUSD", Side::Sell, 1, 5));
        let value = serde_json::to_value(&marker).expect("serialize");

        assert_eq!(value["position"], "aboveBar");
        assert_eq!(value["shape"], "arrowDown");
    }

    #[test]
    fn recording_clones_share_one_log() {
        let recorder = RecordingPresenter::new();
        let mut handle = recorder.clone();
        let date = TradingDate::parse("2023-12-10").expect("date");

        handle.render_viewing_date(date);
        handle.set_historical_banner(true, date);
        handle.report_error("boom");

        assert_eq!(recorder.viewed_dates(), vec![date]);
        assert_eq!(recorder.last_banner(), Some((true, date)));
        assert_eq!(recorder.errors(), vec![String::from("boom")]);
    }
}
