use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{OperatingHours, TimeWindow};

use super::EngineError;

/// Validate a raw (date, start, end) request against calendar and
/// operating-hour rules. First failure wins; nothing is clamped or
/// coerced — an out-of-hours end time is an error, not an adjustment.
///
/// The clock is an explicit parameter so callers (and tests) control it.
/// Knows nothing about rooms or reservations.
pub fn validate(
    date: Option<NaiveDate>,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    now: NaiveDateTime,
    hours: &OperatingHours,
) -> Result<TimeWindow, EngineError> {
    let date = date.ok_or(EngineError::MissingField("date"))?;
    let start = start.ok_or(EngineError::MissingField("startTime"))?;
    let end = end.ok_or(EngineError::MissingField("endTime"))?;

    if date < now.date() {
        return Err(EngineError::PastDate);
    }
    if date == now.date() && date.and_time(start) < now {
        return Err(EngineError::PastTime);
    }
    if end <= start {
        return Err(EngineError::InvalidRange);
    }
    // end == close is permitted: a booking may run exactly to closing time.
    if start < hours.open || end > hours.close {
        return Err(EngineError::OutsideOperatingHours);
    }

    Ok(TimeWindow::new(date, start, end))
}
