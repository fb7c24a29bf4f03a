//! Concrete [`SnapshotSource`](crate::SnapshotSource) implementations.
//!
//! | Adapter | Use |
//! |---------|-----|
//! | [`HttpSnapshotSource`] | REST dashboard API over reqwest |
//! | [`ScriptedSource`] | Deterministic offline data for mock runs and tests |

mod http;
mod scripted;

pub use http::{HttpSnapshotSource, HttpSourceConfig};
pub use scripted::ScriptedSource;
