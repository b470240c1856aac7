use std::collections::HashMap;

use ulid::Ulid;

use crate::model::{Reservation, Room, TimeWindow, Verdict};

use super::availability::{self, LocationFilter, SearchRequest};
use super::{Engine, EngineError};

impl Engine {
    /// Snapshot every room in registration order and resolve verdicts.
    ///
    /// A present `window` is already validated — the type cannot be built
    /// any other way — so this never re-derives it.
    pub async fn search(
        &self,
        location: LocationFilter,
        window: Option<TimeWindow>,
    ) -> Vec<Verdict> {
        let order = self.order.read().await.clone();
        let mut rooms = Vec::with_capacity(order.len());
        let mut reservations_by_room = HashMap::with_capacity(order.len());
        for id in order {
            let Some(rs) = self.get_room(&id) else { continue };
            let guard = rs.read().await;
            rooms.push(guard.room.clone());
            reservations_by_room.insert(id, guard.reservations.clone());
        }

        let request = SearchRequest { location, window };
        availability::search(&request, &rooms, &reservations_by_room)
    }

    pub async fn list_rooms(&self) -> Vec<Room> {
        let order = self.order.read().await.clone();
        let mut rooms = Vec::with_capacity(order.len());
        for id in order {
            if let Some(rs) = self.get_room(&id) {
                rooms.push(rs.read().await.room.clone());
            }
        }
        rooms
    }

    /// A room's full reservation history, cancelled entries included.
    pub async fn reservations_for_room(
        &self,
        room_id: Ulid,
    ) -> Result<Vec<Reservation>, EngineError> {
        let rs = self
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.read().await;
        Ok(guard.reservations.clone())
    }

    pub async fn get_reservation(&self, reservation_id: Ulid) -> Option<Reservation> {
        let room_id = self.room_for_reservation(&reservation_id)?;
        let rs = self.get_room(&room_id)?;
        let guard = rs.read().await;
        guard.get_reservation(reservation_id).cloned()
    }
}
