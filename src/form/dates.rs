use std::sync::Arc;

use crate::domain::{Clock, MonthYear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    #[error("end date is locked while the range is ongoing")]
    EndLocked,
}

/// Start/end pair plus the "ongoing" flag.
///
/// `is_ongoing` implies `end.is_none()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRangeValue {
    pub start: Option<MonthYear>,
    pub end: Option<MonthYear>,
    pub is_ongoing: bool,
    /// Month captured when the range was marked ongoing.
    pub ongoing_since: Option<MonthYear>,
}

impl DateRangeValue {
    /// `false` only when both ends are set and the end precedes the start.
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateRangeController {
    value: DateRangeValue,
    clock: Arc<dyn Clock>,
}

impl DateRangeController {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            value: DateRangeValue::default(),
            clock,
        }
    }

    pub fn value(&self) -> DateRangeValue {
        self.value
    }

    pub fn end_locked(&self) -> bool {
        self.value.is_ongoing
    }

    /// Ordering against the end date is checked at validation time.
    pub fn set_start(&mut self, date: MonthYear) {
        self.value.start = Some(date);
    }

    pub fn clear_start(&mut self) {
        self.value.start = None;
    }

    pub fn set_end(&mut self, date: MonthYear) -> Result<(), DateRangeError> {
        if self.value.is_ongoing {
            return Err(DateRangeError::EndLocked);
        }
        self.value.end = Some(date);
        Ok(())
    }

    pub fn clear_end(&mut self) -> Result<(), DateRangeError> {
        if self.value.is_ongoing {
            return Err(DateRangeError::EndLocked);
        }
        self.value.end = None;
        Ok(())
    }

    /// Switching to ongoing discards the end date for good; switching back
    /// leaves the end empty until a new one is picked.
    pub fn set_ongoing(&mut self, ongoing: bool) {
        if ongoing {
            if !self.value.is_ongoing {
                self.value.ongoing_since = Some(self.clock.current_month());
            }
            self.value.end = None;
        } else {
            self.value.ongoing_since = None;
        }
        self.value.is_ongoing = ongoing;
    }
}
