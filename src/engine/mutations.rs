use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::{Reservation, ReservationStatus, Room, RoomState, RoomStatus, TimeWindow};
use crate::observability;

use super::conflict::find_conflict;
use super::{Engine, EngineError, SharedRoomState};

impl Engine {
    /// Register a room from the catalog. Ids are stable for the life of
    /// the process.
    pub async fn register_room(&self, room: Room) -> Result<(), EngineError> {
        let id = room.id;
        if self.rooms.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        self.rooms
            .insert(id, Arc::new(RwLock::new(RoomState::new(room))));
        self.order.write().await.push(id);
        metrics::gauge!(observability::ROOMS_REGISTERED).set(self.rooms.len() as f64);
        Ok(())
    }

    /// Reflect a catalog-side operational status change.
    pub async fn set_room_status(&self, id: Ulid, status: RoomStatus) -> Result<(), EngineError> {
        let rs = self.get_room(&id).ok_or(EngineError::RoomNotFound(id))?;
        let mut guard = rs.write().await;
        guard.room.status = status;
        Ok(())
    }

    /// Commit a booking.
    ///
    /// The conflict check and the insert run under the room's write lock:
    /// a concurrent overlapping booking serializes behind this one and is
    /// rejected with `Conflict` when it re-checks. The window is already
    /// validated by construction; maintenance wins over everything else.
    pub async fn book(
        &self,
        room_id: Ulid,
        window: TimeWindow,
    ) -> Result<Reservation, EngineError> {
        let rs = self
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let mut guard = rs.write().await;

        if guard.room.status == RoomStatus::Maintenance {
            return Err(EngineError::Maintenance(room_id));
        }
        if let Some(hit) = find_conflict(&window, &guard.reservations) {
            return Err(EngineError::Conflict(hit.id));
        }

        let reservation = Reservation {
            id: Ulid::new(),
            room_id,
            window,
            status: ReservationStatus::Confirmed,
        };
        guard.insert_reservation(reservation.clone());
        self.reservation_to_room.insert(reservation.id, room_id);
        Ok(reservation)
    }

    /// Cancel a reservation, keeping the record in the room's history as
    /// `Cancelled` so overlap history stays auditable. Re-cancelling is a
    /// no-op. Returns the owning room id.
    pub async fn cancel(&self, reservation_id: Ulid) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_reservation_write(&reservation_id).await?;
        if let Some(r) = guard.get_reservation_mut(reservation_id) {
            r.status = ReservationStatus::Cancelled;
        }
        Ok(room_id)
    }

    /// Flip confirmed reservations whose window has fully passed to
    /// `Completed`. Returns how many were flipped.
    pub async fn sweep_completed(&self, now: NaiveDateTime) -> usize {
        let rooms: Vec<SharedRoomState> =
            self.rooms.iter().map(|e| e.value().clone()).collect();
        let mut flipped = 0;
        for rs in rooms {
            let mut guard = rs.write().await;
            for r in guard.reservations.iter_mut() {
                if r.status == ReservationStatus::Confirmed && r.window.end_instant() <= now {
                    r.status = ReservationStatus::Completed;
                    flipped += 1;
                }
            }
        }
        flipped
    }
}
