mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod window;

pub use availability::{search, LocationFilter, SearchRequest};
pub use conflict::{find_conflict, has_conflict};
pub use error::EngineError;
pub use window::validate;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::{OperatingHours, RoomState, TimeWindow};

pub type SharedRoomState = Arc<RwLock<RoomState>>;

/// The booking engine: per-room state behind per-room locks.
///
/// Every write to a room happens under that room's write lock, so a
/// booking's conflict re-check and its insert form a single atomic unit —
/// of two concurrent overlapping bookings, the loser observes the
/// winner's write and is rejected. The engine holds no lock across rooms
/// and performs no I/O.
pub struct Engine {
    rooms: DashMap<Ulid, SharedRoomState>,
    /// Registration order; search output follows it.
    order: RwLock<Vec<Ulid>>,
    /// Reverse lookup: reservation id → room id.
    reservation_to_room: DashMap<Ulid, Ulid>,
    hours: OperatingHours,
}

impl Engine {
    pub fn new(hours: OperatingHours) -> Self {
        Self {
            rooms: DashMap::new(),
            order: RwLock::new(Vec::new()),
            reservation_to_room: DashMap::new(),
            hours,
        }
    }

    pub fn hours(&self) -> &OperatingHours {
        &self.hours
    }

    /// Validate a raw window against this engine's operating hours.
    pub fn validate_window(
        &self,
        date: Option<NaiveDate>,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
        now: NaiveDateTime,
    ) -> Result<TimeWindow, EngineError> {
        window::validate(date, start, end, now, &self.hours)
    }

    pub fn get_room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn room_for_reservation(&self, reservation_id: &Ulid) -> Option<Ulid> {
        self.reservation_to_room
            .get(reservation_id)
            .map(|e| *e.value())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lookup reservation → room, get the room, acquire its write lock.
    pub(super) async fn resolve_reservation_write(
        &self,
        reservation_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .room_for_reservation(reservation_id)
            .ok_or(EngineError::ReservationNotFound(*reservation_id))?;
        let rs = self
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(OperatingHours::default())
    }
}
