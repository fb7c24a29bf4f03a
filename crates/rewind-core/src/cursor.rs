//! Range-clamped date cursor and its navigation transitions.

use crate::{DateRange, TradingDate};

/// Result of a cursor transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub date: TradingDate,
    /// `false` when the cursor was already at the bound the move pushes against.
    pub changed: bool,
}

/// Owns the currently viewed date; every write is clamped into the range.
#[derive(Debug, Clone)]
pub struct SnapshotCursor {
    range: DateRange,
    current: TradingDate,
}

impl SnapshotCursor {
    /// Cursor positioned at the end of the range.
    pub fn at_end(range: DateRange) -> Self {
        Self {
            range,
            current: range.max(),
        }
    }

    pub fn new(range: DateRange, date: TradingDate) -> Self {
        Self {
            range,
            current: range.clamp(date),
        }
    }

    pub const fn current(&self) -> TradingDate {
        self.current
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub fn is_at_end(&self) -> bool {
        self.current == self.range.max()
    }

    pub fn is_at_start(&self) -> bool {
        self.current == self.range.min()
    }

    pub fn day_forward(&mut self) -> Transition {
        self.set(self.current.add_days(1))
    }

    pub fn day_backward(&mut self) -> Transition {
        self.set(self.current.add_days(-1))
    }

    pub fn month_forward(&mut self) -> Transition {
        self.set(self.current.add_months(1))
    }

    pub fn month_backward(&mut self) -> Transition {
        self.set(self.current.add_months(-1))
    }

    pub fn jump_to(&mut self, date: TradingDate) -> Transition {
        self.set(date)
    }

    pub fn jump_to_start(&mut self) -> Transition {
        self.set(self.range.min())
    }

    pub fn jump_to_end(&mut self) -> Transition {
        self.set(self.range.max())
    }

    fn set(&mut self, target: TradingDate) -> Transition {
        let date = self.range.clamp(target);
        let changed = date != self.current;
        self.current = date;
        Transition { date, changed }
    }
}
