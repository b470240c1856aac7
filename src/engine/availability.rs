use std::collections::HashMap;

use ulid::Ulid;

use crate::model::{Reservation, Room, RoomStatus, TimeWindow, Verdict, VerdictReason};

use super::conflict::find_conflict;

/// Location filter for a search. `All` matches every room; `At` is an
/// exact match on `Room::location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    All,
    At(String),
}

impl LocationFilter {
    /// Parse the wire form: unset, empty, and the literal `All` mean no
    /// filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => LocationFilter::All,
            Some(s) if s.is_empty() || s == "All" => LocationFilter::All,
            Some(s) => LocationFilter::At(s.to_string()),
        }
    }

    pub fn matches(&self, room: &Room) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::At(location) => room.location == *location,
        }
    }
}

/// A search query: a location filter plus an optional validated window.
/// No window means a browse query — operational status only.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub location: LocationFilter,
    pub window: Option<TimeWindow>,
}

/// Resolve a verdict for every room matching the filter.
///
/// Output order follows the input `rooms` order; callers needing ranking
/// apply it themselves. Maintenance always wins, independent of
/// conflicts; the conflict scan only runs for operational rooms when a
/// window is present. Rooms absent from `reservations_by_room` simply
/// have no history.
pub fn search(
    request: &SearchRequest,
    rooms: &[Room],
    reservations_by_room: &HashMap<Ulid, Vec<Reservation>>,
) -> Vec<Verdict> {
    rooms
        .iter()
        .filter(|room| request.location.matches(room))
        .map(|room| resolve(room, request.window.as_ref(), reservations_by_room))
        .collect()
}

fn resolve(
    room: &Room,
    window: Option<&TimeWindow>,
    reservations_by_room: &HashMap<Ulid, Vec<Reservation>>,
) -> Verdict {
    if room.status == RoomStatus::Maintenance {
        return verdict(room, false, VerdictReason::Maintenance);
    }
    let Some(window) = window else {
        return verdict(room, true, VerdictReason::Ok);
    };

    let existing = reservations_by_room
        .get(&room.id)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    match find_conflict(window, existing) {
        Some(_) => verdict(room, false, VerdictReason::Conflict),
        None => verdict(room, true, VerdictReason::Ok),
    }
}

fn verdict(room: &Room, is_bookable: bool, reason: VerdictReason) -> Verdict {
    Verdict {
        room: room.clone(),
        is_bookable,
        reason,
    }
}
