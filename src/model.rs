use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Operating hours shared by every room. `close` is an exclusive-style
/// boundary except that a booking may end exactly at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OperatingHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        debug_assert!(open < close, "open must be before close");
        Self { open, close }
    }
}

impl Default for OperatingHours {
    /// 09:00–18:00.
    fn default() -> Self {
        Self::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        )
    }
}

/// A validated booking window: one calendar day, half-open `[start, end)`.
///
/// Constructed only by the validator, so holding one is proof the request
/// passed the calendar and operating-hours rules. Never mutated — a new
/// request produces a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub(crate) fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end, "window start must be before end");
        Self { date, start, end }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Absolute instant at which the window is over.
    pub fn end_instant(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    /// Half-open overlap on the same calendar day. Back-to-back windows
    /// (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

/// Reservation lifecycle. `Completed` keeps blocking overlap checks the
/// same way `Confirmed` does; only `Cancelled` drops out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Whether a reservation in this status participates in conflict checks.
    pub fn blocks(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Ulid,
    pub room_id: Ulid,
    pub window: TimeWindow,
    pub status: ReservationStatus,
}

/// Room-level operational flag, independent of booking state. A room can
/// be operational yet conflicted for a specific window, or unbookable for
/// every window while under maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Ulid,
    pub name: String,
    pub location: String,
    pub capacity: u32,
    pub amenities: BTreeSet<String>,
    pub status: RoomStatus,
}

/// Why a room is or is not bookable for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictReason {
    Ok,
    OutsideHours,
    Past,
    Maintenance,
    Conflict,
}

/// The engine's classification of one room against one query. Computed
/// fresh per search, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub room: Room,
    pub is_bookable: bool,
    pub reason: VerdictReason,
}

/// A room plus its full reservation history, sorted by (date, start) so
/// scans and conflict reporting are reproducible.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub room: Room,
    pub reservations: Vec<Reservation>,
}

impl RoomState {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            reservations: Vec::new(),
        }
    }

    /// Insert maintaining the (date, start) sort order.
    pub fn insert_reservation(&mut self, reservation: Reservation) {
        let key = (reservation.window.date(), reservation.window.start());
        let pos = self
            .reservations
            .partition_point(|r| (r.window.date(), r.window.start()) <= key);
        self.reservations.insert(pos, reservation);
    }

    pub fn get_reservation(&self, id: Ulid) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    pub fn get_reservation_mut(&mut self, id: Ulid) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.id == id)
    }
}
