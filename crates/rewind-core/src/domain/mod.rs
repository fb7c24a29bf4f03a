//! # Domain Models
//!
//! Wire and domain types shared by the navigation engine and its data source.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingDate`] | Calendar day, no time-of-day |
//! | [`Snapshot`] | Account bundle for one date |
//! | [`AccountSummary`] | Balance, equity, unrealized PnL |
//! | [`Position`] / [`Order`] / [`Execution`] | Table rows |
//! | [`Kline`] | OHLCV candle |
//! | [`AccountInfo`] | Live account statistics |
//! | [`Symbol`] | Validated contract symbol |
//! | [`Timeframe`] | Candle bucket (1h, 1d) |
//!
//! Wire names follow the dashboard API: camelCase fields, `Buy`/`Sell` and
//! `Long`/`Short` sides, dates as `YYYY-MM-DD`.

mod date;
mod models;
mod symbol;
mod timeframe;

pub use date::TradingDate;
pub use models::{
    AccountInfo, AccountSummary, Execution, Kline, Order, Position, PositionSide, Side, Snapshot,
};
pub use symbol::{is_bitcoin_symbol, Symbol};
pub use timeframe::Timeframe;
