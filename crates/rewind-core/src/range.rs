//! Closed calendar range bounding every navigation.

use serde::{Deserialize, Serialize};

use crate::{TradingDate, ValidationError};

/// Immutable `[min, max]` bounds with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    min: TradingDate,
    max: TradingDate,
}

impl DateRange {
    pub fn new(min: TradingDate, max: TradingDate) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range from `min` up to the current UTC day.
    pub fn ending_today(min: TradingDate) -> Result<Self, ValidationError> {
        Self::new(min, TradingDate::today_utc())
    }

    pub const fn min(&self) -> TradingDate {
        self.min
    }

    pub const fn max(&self) -> TradingDate {
        self.max
    }

    pub fn contains(&self, date: TradingDate) -> bool {
        self.min <= date && date <= self.max
    }

    pub fn clamp(&self, date: TradingDate) -> TradingDate {
        date.clamp(self.min, self.max)
    }
}
