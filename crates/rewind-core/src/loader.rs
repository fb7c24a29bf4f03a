//! Snapshot loading with stale-response suppression.
//!
//! Every [`SnapshotLoader::load`] call takes the next sequence token at call
//! time. When the fetch completes, its result is delivered only if no newer
//! token has been issued in the meantime; otherwise it comes back as
//! [`LoadOutcome::Superseded`] and any failure it carried is dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::{Snapshot, SnapshotSource, SourceError, TradingDate};

/// In-flight correlation record for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub date: TradingDate,
    pub token: u64,
}

/// Failure of the latest load, tagged with the date that was attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to load snapshot for {date}: {source}")]
pub struct LoadError {
    pub date: TradingDate,
    pub source: SourceError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Fresh {
        request: SnapshotRequest,
        snapshot: Snapshot,
    },
    Failed {
        request: SnapshotRequest,
        error: LoadError,
    },
    /// A newer load was issued before this one completed.
    Superseded { request: SnapshotRequest },
}

impl LoadOutcome {
    pub const fn request(&self) -> SnapshotRequest {
        match self {
            Self::Fresh { request, .. }
            | Self::Failed { request, .. }
            | Self::Superseded { request } => *request,
        }
    }
}

/// Issues snapshot fetches and decides which results are still wanted.
#[derive(Clone)]
pub struct SnapshotLoader {
    source: Arc<dyn SnapshotSource>,
    latest: Arc<AtomicU64>,
}

impl SnapshotLoader {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Token of the most recently issued load; `0` before the first one.
    pub fn latest_token(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, token: u64) -> bool {
        self.latest_token() == token
    }

    /// Starts a load for `date`. The token is claimed before this returns,
    /// so call order alone decides which load is the latest.
    pub fn load(&self, date: TradingDate) -> impl Future<Output = LoadOutcome> + Send + 'static {
        let request = SnapshotRequest {
            date,
            token: self.latest.fetch_add(1, Ordering::SeqCst) + 1,
        };
        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        debug!(%date, token = request.token, "snapshot load issued");

        async move {
            let result = source.snapshot(request.date).await;

            if latest.load(Ordering::SeqCst) != request.token {
                debug!(date = %request.date, token = request.token, "snapshot load superseded");
                return LoadOutcome::Superseded { request };
            }

            match result {
                Ok(snapshot) => LoadOutcome::Fresh { request, snapshot },
                Err(source) => LoadOutcome::Failed {
                    request,
                    error: LoadError {
                        date: request.date,
                        source,
                    },
                },
            }
        }
    }
}
