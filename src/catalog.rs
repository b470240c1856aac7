use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::Deserialize;
use ulid::Ulid;

use crate::model::{Room, RoomStatus};

/// One entry of the JSON room seed.
///
/// Status strings arrive in whatever casing the upstream catalog used
/// ("available", "Available", "MAINTENANCE"); they are normalized into
/// the closed `RoomStatus` enum here and nowhere else.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomSeed {
    #[serde(default)]
    id: Option<Ulid>,
    name: String,
    location: String,
    capacity: u32,
    #[serde(default)]
    amenities: Vec<String>,
    status: String,
}

/// Load and normalize the room catalog from a JSON seed file.
pub fn load_rooms(path: &Path) -> io::Result<Vec<Room>> {
    let raw = std::fs::read_to_string(path)?;
    parse_rooms(&raw)
}

pub fn parse_rooms(raw: &str) -> io::Result<Vec<Room>> {
    let seeds: Vec<RoomSeed> =
        serde_json::from_str(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    seeds.into_iter().map(room_from_seed).collect()
}

fn room_from_seed(seed: RoomSeed) -> io::Result<Room> {
    let status = parse_status(&seed.status).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown room status: {:?}", seed.status),
        )
    })?;
    Ok(Room {
        id: seed.id.unwrap_or_else(Ulid::new),
        name: seed.name,
        location: seed.location,
        capacity: seed.capacity,
        amenities: seed.amenities.into_iter().collect::<BTreeSet<_>>(),
        status,
    })
}

/// Normalize a loosely-cased status string. Unknown statuses are an
/// error, never a silent default.
fn parse_status(raw: &str) -> Option<RoomStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "available" => Some(RoomStatus::Available),
        "maintenance" => Some(RoomStatus::Maintenance),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case_statuses() {
        let raw = r#"[
            {"name": "R101", "location": "Pune_Baner", "capacity": 8, "status": "Available"},
            {"name": "R102", "location": "Pune_Baner", "capacity": 4, "status": "MAINTENANCE"},
            {"name": "R201", "location": "Hyderabad", "capacity": 12, "status": "available"}
        ]"#;
        let rooms = parse_rooms(raw).unwrap();
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[0].status, RoomStatus::Available);
        assert_eq!(rooms[1].status, RoomStatus::Maintenance);
        assert_eq!(rooms[2].status, RoomStatus::Available);
    }

    #[test]
    fn unknown_status_rejected() {
        let raw = r#"[{"name": "R101", "location": "Pune_Baner", "capacity": 8, "status": "booked"}]"#;
        let err = parse_rooms(raw).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("booked"));
    }

    #[test]
    fn missing_id_is_minted_and_given_id_preserved() {
        let id = Ulid::new();
        let raw = format!(
            r#"[
                {{"name": "R101", "location": "Pune_Baner", "capacity": 8, "status": "available"}},
                {{"id": "{id}", "name": "R102", "location": "Pune_Baner", "capacity": 4, "status": "available"}}
            ]"#
        );
        let rooms = parse_rooms(&raw).unwrap();
        assert_ne!(rooms[0].id, rooms[1].id);
        assert_eq!(rooms[1].id, id);
    }

    #[test]
    fn amenities_dedupe_into_a_set() {
        let raw = r#"[{
            "name": "R101", "location": "Pune_Baner", "capacity": 8,
            "amenities": ["projector", "whiteboard", "projector"],
            "status": "available"
        }]"#;
        let rooms = parse_rooms(raw).unwrap();
        assert_eq!(rooms[0].amenities.len(), 2);
        assert!(rooms[0].amenities.contains("projector"));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("huddle_test_catalog");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rooms.json");
        std::fs::write(
            &path,
            r#"[{"name": "R101", "location": "Hyderabad", "capacity": 6, "status": "available"}]"#,
        )
        .unwrap();

        let rooms = load_rooms(&path).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "R101");
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(parse_rooms("not json").is_err());
    }
}
