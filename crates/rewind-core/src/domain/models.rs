use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::symbol::is_bitcoin_symbol;
use crate::TradingDate;

/// Order/execution direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

/// Net position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

/// Account balance figures in BTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub balance: f64,
    pub total_equity: f64,
    pub unrealized_pnl: f64,
}

impl AccountSummary {
    /// Equity is the wallet balance plus unrealized PnL of the given positions.
    pub fn from_positions(balance: f64, positions: &[Position]) -> Self {
        let unrealized_pnl = positions.iter().map(|pos| pos.unrealized_pnl).sum::<f64>();
        Self {
            balance,
            total_equity: balance + unrealized_pnl,
            unrealized_pnl,
        }
    }
}

/// Open position reconstructed for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub qty: i64,
    pub entry_price: f64,
    pub current_price: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_percent: f64,
}

impl Position {
    pub fn is_bitcoin(&self) -> bool {
        is_bitcoin_symbol(&self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub qty: i64,
    pub order_type: String,
    pub status: String,
    pub timestamp: String,
    pub timestamp_unix: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub exec_id: String,
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub qty: i64,
    pub commission: f64,
    pub timestamp: String,
    pub timestamp_unix: i64,
}

/// OHLCV candle keyed by unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Live account statistics from the account endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub balance: f64,
    pub today_pnl: f64,
    pub today_pnl_percent: f64,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub total_trades: u64,
}

/// Point-in-time bundle of account state for one calendar date.
///
/// The account figures sit flat at the top level of the wire object. List
/// fields must be present but may be `null`, which reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub date: TradingDate,
    #[serde(flatten)]
    pub account: AccountSummary,
    #[serde(deserialize_with = "null_as_empty")]
    pub btc_positions: Vec<Position>,
    #[serde(deserialize_with = "null_as_empty")]
    pub today_orders: Vec<Order>,
    #[serde(deserialize_with = "null_as_empty")]
    pub recent_execs: Vec<Execution>,
    #[serde(deserialize_with = "null_as_empty")]
    pub kline_data: Vec<Kline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<TradingDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<TradingDate>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
