//! Snapshot data source contract and its error type.
//!
//! # Endpoints
//!
//! | Endpoint | Method | Response |
//! |----------|--------|----------|
//! | Snapshot | [`snapshot`](SnapshotSource::snapshot) | [`Snapshot`] for one date |
//! | Klines | [`klines`](SnapshotSource::klines) | ordered [`Kline`] series |
//! | Orders | [`orders`](SnapshotSource::orders) | all orders, optional status filter |
//! | Pending orders | [`pending_orders`](SnapshotSource::pending_orders) | open orders |
//! | Executions | [`executions`](SnapshotSource::executions) | fills |
//! | Positions | [`positions`](SnapshotSource::positions) | current positions |
//! | Account | [`account`](SnapshotSource::account) | [`AccountInfo`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{
    AccountInfo, Execution, Kline, Order, Position, Snapshot, Symbol, Timeframe, TradingDate,
};

/// Boxed future returned by every source call.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Data endpoint, used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Snapshot,
    Klines,
    Orders,
    PendingOrders,
    Executions,
    Positions,
    Account,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Klines => "klines",
            Self::Orders => "orders",
            Self::PendingOrders => "pending_orders",
            Self::Executions => "executions",
            Self::Positions => "positions",
            Self::Account => "account",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Connection, timeout or body read failure.
    Unavailable,
    /// Upstream answered with a non-success status.
    Status,
    /// Body was not the expected JSON shape.
    Malformed,
    InvalidRequest,
}

/// Structured data source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn status(endpoint: Endpoint, status: u16) -> Self {
        Self {
            kind: SourceErrorKind::Status,
            message: format!("{endpoint} endpoint returned status {status}"),
        }
    }

    pub fn malformed(endpoint: Endpoint, detail: impl Display) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: format!("{endpoint} payload is malformed: {detail}"),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Read-only dashboard data source.
///
/// Implementations must be `Send + Sync`: loads run as spawned tasks that
/// share one source.
pub trait SnapshotSource: Send + Sync {
    /// Account bundle for one calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the source is unreachable, answers with
    /// a failure status or returns a payload missing expected fields.
    fn snapshot<'a>(&'a self, date: TradingDate) -> SourceFuture<'a, Snapshot>;

    /// Candles for a symbol, oldest first.
    fn klines<'a>(
        &'a self,
        symbol: &'a Symbol,
        timeframe: Timeframe,
    ) -> SourceFuture<'a, Vec<Kline>>;

    /// All orders, optionally filtered by status (e.g. `Filled`).
    fn orders<'a>(&'a self, status: Option<&'a str>) -> SourceFuture<'a, Vec<Order>>;

    fn pending_orders<'a>(&'a self) -> SourceFuture<'a, Vec<Order>>;

    fn executions<'a>(&'a self) -> SourceFuture<'a, Vec<Execution>>;

    fn positions<'a>(&'a self) -> SourceFuture<'a, Vec<Position>>;

    fn account<'a>(&'a self) -> SourceFuture<'a, AccountInfo>;
}
