//! # Rewind Core
//!
//! Temporal navigation and playback engine for a trading-account dashboard.
//!
//! ## Overview
//!
//! This crate lets a user move through daily historical snapshots of an
//! account:
//!
//! - **Bounded date cursor** with day, month and jump transitions
//! - **Timed playback** that advances one day per tick and stops at today
//! - **Snapshot loading** that never presents a superseded response
//! - **Data source trait** with an HTTP adapter and an offline adapter
//! - **Push-only presenter boundary** for terminals, charts and tests
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Snapshot sources (HTTP dashboard API, scripted) |
//! | [`clock`] | Playback speed and cancellable interval timer |
//! | [`controller`] | Navigation controller actor and its handle |
//! | [`cursor`] | Range-clamped date cursor |
//! | [`data_source`] | Data source trait and structured errors |
//! | [`domain`] | Domain models (Snapshot, Position, Order, Kline, ...) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`keys`] | Keyboard shortcut mapping |
//! | [`live`] | Live dashboard refresh |
//! | [`loader`] | Snapshot loader with stale-response suppression |
//! | [`presenter`] | Presenter trait, chart markers, recording presenter |
//! | [`range`] | Closed date range |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rewind_core::{
//!     Command, ControllerConfig, HttpSnapshotSource, NavigationController, RecordingPresenter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = NavigationController::starting_today(
//!         ControllerConfig::default(),
//!         Arc::new(HttpSnapshotSource::default()),
//!         Box::new(RecordingPresenter::new()),
//!     )?;
//!     let (handle, task) = controller.spawn();
//!
//!     handle.send(Command::PreviousMonth).await?;
//!     handle.send(Command::Play).await?;
//!
//!     drop(handle);
//!     task.await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Keyboard / CLI  │
//! └────────┬────────┘
//!          │ Command
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Navigation      │────▶│ Playback Clock   │
//! │ Controller      │◀────│ (ticks)          │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Snapshot Loader │────▶│ Snapshot Source  │
//! │ (tokens)        │     │ (HTTP / scripted)│
//! └────────┬────────┘     └──────────────────┘
//!          │ latest only
//!          ▼
//! ┌─────────────────┐
//! │ Presenter       │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Navigation never fails: out-of-range targets are clamped. Load failures
//! reach the presenter as one message and leave the last render in place.
//!
//! ```rust
//! use rewind_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => "dashboard API unreachable",
//!         SourceErrorKind::Status => "dashboard API rejected the request",
//!         SourceErrorKind::Malformed => "dashboard API sent an unexpected payload",
//!         SourceErrorKind::InvalidRequest => "request could not be built",
//!     }
//! }
//! ```

pub mod adapters;
pub mod clock;
pub mod controller;
pub mod cursor;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod keys;
pub mod live;
pub mod loader;
pub mod presenter;
pub mod range;

// Adapter implementations
pub use adapters::{HttpSnapshotSource, HttpSourceConfig, ScriptedSource};

// Playback timing
pub use clock::{PlaybackClock, PlaybackSpeed};

// Controller
pub use controller::{
    Command, ControllerClosed, ControllerConfig, ControllerHandle, ControllerStatus,
    NavigationController,
};

// Cursor
pub use cursor::{SnapshotCursor, Transition};

// Data source trait and types
pub use data_source::{Endpoint, SnapshotSource, SourceError, SourceErrorKind, SourceFuture};

// Domain models
pub use domain::{
    is_bitcoin_symbol, AccountInfo, AccountSummary, Execution, Kline, Order, Position,
    PositionSide, Side, Snapshot, Symbol, Timeframe, TradingDate,
};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient,
    StaticHttpClient,
};

// Keyboard
pub use keys::{command_for_key, FocusTarget, Key};

// Live dashboard
pub use live::{LiveDashboard, LiveView, REFRESH_INTERVAL};

// Loading
pub use loader::{LoadError, LoadOutcome, SnapshotLoader, SnapshotRequest};

// Presentation
pub use presenter::{
    execution_markers, present_snapshot, ChartMarker, MarkerPosition, MarkerShape, Presenter,
    PresenterEvent, RecordingPresenter,
};

// Range
pub use range::DateRange;
