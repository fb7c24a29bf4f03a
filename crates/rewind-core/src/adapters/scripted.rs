use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::data_source::{SnapshotSource, SourceError, SourceFuture};
use crate::{
    AccountInfo, AccountSummary, Execution, Kline, Order, Position, PositionSide, Side, Snapshot,
    Symbol, Timeframe, TradingDate,
};

const KLINE_LOOKBACK_DAYS: i64 = 90;
const SECONDS_PER_DAY: i64 = 86_400;

/// Deterministic offline source used by `--mock` runs and tests.
///
/// Every date yields a synthetic snapshot derived from the date alone.
/// Latency and failures can be scripted per date; latency is a tokio sleep,
/// so paused-clock tests stay deterministic.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    latencies: HashMap<TradingDate, Duration>,
    failures: HashMap<TradingDate, SourceError>,
    live_failure: Option<SourceError>,
    today: Option<TradingDate>,
    snapshot_calls: Mutex<Vec<TradingDate>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency_for(mut self, date: TradingDate, latency: Duration) -> Self {
        self.latencies.insert(date, latency);
        self
    }

    pub fn with_failure_for(mut self, date: TradingDate, error: SourceError) -> Self {
        self.failures.insert(date, error);
        self
    }

    /// Makes every live endpoint (klines, orders, positions, ...) fail.
    pub fn with_live_failure(mut self, error: SourceError) -> Self {
        self.live_failure = Some(error);
        self
    }

    /// Day the live endpoints report as "now"; defaults to today (UTC).
    pub fn with_today(mut self, today: TradingDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Dates requested through [`SnapshotSource::snapshot`], in call order.
    pub fn snapshot_calls(&self) -> Vec<TradingDate> {
        self.snapshot_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn today(&self) -> TradingDate {
        self.today.unwrap_or_else(TradingDate::today_utc)
    }

    fn live<T>(&self, value: impl FnOnce() -> T) -> Result<T, SourceError> {
        match &self.live_failure {
            Some(error) => Err(error.clone()),
            None => Ok(value()),
        }
    }
}

impl SnapshotSource for ScriptedSource {
    fn snapshot<'a>(&'a self, date: TradingDate) -> SourceFuture<'a, Snapshot> {
        if let Ok(mut calls) = self.snapshot_calls.lock() {
            calls.push(date);
        }
        let latency = self.latencies.get(&date).copied().unwrap_or_default();
        let failure = self.failures.get(&date).cloned();

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match failure {
                Some(error) => Err(error),
                None => Ok(synthetic_snapshot(date)),
            }
        })
    }

    fn klines<'a>(
        &'a self,
        _symbol: &'a Symbol,
        timeframe: Timeframe,
    ) -> SourceFuture<'a, Vec<Kline>> {
        Box::pin(async move {
            self.live(|| match timeframe {
                Timeframe::OneDay => daily_klines(self.today()),
                Timeframe::OneHour => hourly_klines(self.today()),
            })
        })
    }

    fn orders<'a>(&'a self, status: Option<&'a str>) -> SourceFuture<'a, Vec<Order>> {
        Box::pin(async move {
            self.live(|| {
                synthetic_orders(self.today())
                    .into_iter()
                    .filter(|order| status.map_or(true, |status| order.status == status))
                    .collect()
            })
        })
    }

    fn pending_orders<'a>(&'a self) -> SourceFuture<'a, Vec<Order>> {
        Box::pin(async move {
            self.live(|| {
                synthetic_orders(self.today())
                    .into_iter()
                    .filter(|order| order.status == "New")
                    .collect()
            })
        })
    }

    fn executions<'a>(&'a self) -> SourceFuture<'a, Vec<Execution>> {
        Box::pin(async move { self.live(|| synthetic_executions(self.today())) })
    }

    fn positions<'a>(&'a self) -> SourceFuture<'a, Vec<Position>> {
        Box::pin(async move { self.live(|| synthetic_positions(self.today())) })
    }

    fn account<'a>(&'a self) -> SourceFuture<'a, AccountInfo> {
        Box::pin(async move {
            self.live(|| AccountInfo {
                balance: synthetic_balance(self.today()),
                today_pnl: 0.0012,
                today_pnl_percent: 0.08,
                total_pnl: 0.42,
                win_rate: 54.5,
                total_trades: 311,
            })
        })
    }
}

/// Deterministic close price for a day: a slow triangle wave around 30k.
fn close_price(date: TradingDate) -> f64 {
    let day = date.unix_midnight().div_euclid(SECONDS_PER_DAY);
    let phase = day.rem_euclid(400) as f64;
    let wave = if phase < 200.0 { phase } else { 400.0 - phase };
    20_000.0 + wave * 100.0
}

fn synthetic_balance(date: TradingDate) -> f64 {
    let day = date.unix_midnight().div_euclid(SECONDS_PER_DAY);
    1.0 + day.rem_euclid(97) as f64 / 1_000.0
}

fn candle(time: i64, open: f64, close: f64) -> Kline {
    Kline {
        time,
        open,
        high: open.max(close) * 1.01,
        low: open.min(close) * 0.99,
        close,
        volume: 1_000_000,
    }
}

fn daily_klines(until: TradingDate) -> Vec<Kline> {
    (0..=KLINE_LOOKBACK_DAYS)
        .rev()
        .map(|back| {
            let day = until.add_days(-back);
            candle(day.unix_midnight(), close_price(day.add_days(-1)), close_price(day))
        })
        .collect()
}

fn hourly_klines(until: TradingDate) -> Vec<Kline> {
    let start = until.add_days(-1).unix_midnight();
    let from = close_price(until.add_days(-1));
    let to = close_price(until);
    (0..24_i32)
        .map(|hour| {
            let open = from + (to - from) * f64::from(hour) / 24.0;
            let close = from + (to - from) * f64::from(hour + 1) / 24.0;
            candle(start + i64::from(hour) * 3_600, open, close)
        })
        .collect()
}

fn synthetic_orders(date: TradingDate) -> Vec<Order> {
    let base = date.unix_midnight();
    let price = close_price(date);
    vec![
        Order {
            order_id: format!("ord-{date}-2"),
            symbol: String::from(Symbol::DEFAULT_CHART),
            side: Side::Sell,
            price: (price * 1.02).round(),
            qty: 500,
            order_type: String::from("Limit"),
            status: String::from("New"),
            timestamp: format!("{date}T14:00:00Z"),
            timestamp_unix: base + 14 * 3_600,
        },
        Order {
            order_id: format!("ord-{date}-1"),
            symbol: String::from(Symbol::DEFAULT_CHART),
            side: Side::Buy,
            price: price.round(),
            qty: 1_000,
            order_type: String::from("Limit"),
            status: String::from("Filled"),
            timestamp: format!("{date}T09:00:00Z"),
            timestamp_unix: base + 9 * 3_600,
        },
    ]
}

fn synthetic_executions(date: TradingDate) -> Vec<Execution> {
    (0..3)
        .map(|back| {
            let day = date.add_days(-back * 7);
            let side = if back % 2 == 0 { Side::Buy } else { Side::Sell };
            Execution {
                exec_id: format!("exec-{day}"),
                order_id: format!("ord-{day}-1"),
                symbol: String::from(Symbol::DEFAULT_CHART),
                side,
                price: close_price(day).round(),
                qty: 1_000,
                commission: 0.000_75,
                timestamp: format!("{day}T09:00:00Z"),
                timestamp_unix: day.unix_midnight() + 9 * 3_600,
            }
        })
        .collect()
}

fn synthetic_positions(date: TradingDate) -> Vec<Position> {
    let entry_price = close_price(date.add_days(-30));
    let current_price = close_price(date);
    let qty = 1_000_i64;
    let unrealized_pnl = qty as f64 * (1.0 / entry_price - 1.0 / current_price);
    vec![
        Position {
            symbol: String::from(Symbol::DEFAULT_CHART),
            side: PositionSide::Long,
            qty,
            entry_price,
            current_price,
            unrealized_pnl,
            unrealized_pnl_percent: (current_price / entry_price - 1.0) * 100.0,
        },
        Position {
            symbol: String::from("ETHUSD"),
            side: PositionSide::Short,
            qty: -10,
            entry_price: 2_000.0,
            current_price: 2_000.0,
            unrealized_pnl: 0.0,
            unrealized_pnl_percent: 0.0,
        },
    ]
}

fn synthetic_snapshot(date: TradingDate) -> Snapshot {
    let btc_positions: Vec<Position> = synthetic_positions(date)
        .into_iter()
        .filter(Position::is_bitcoin)
        .collect();
    let recent_execs = synthetic_executions(date);

    Snapshot {
        date,
        account: AccountSummary::from_positions(synthetic_balance(date), &btc_positions),
        btc_positions,
        today_orders: synthetic_orders(date),
        recent_execs,
        kline_data: daily_klines(date),
        min_date: None,
        max_date: None,
    }
}
