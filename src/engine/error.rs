use ulid::Ulid;

use crate::model::VerdictReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    MissingField(&'static str),
    PastDate,
    PastTime,
    InvalidRange,
    OutsideOperatingHours,
    RoomNotFound(Ulid),
    ReservationNotFound(Ulid),
    AlreadyExists(Ulid),
    Maintenance(Ulid),
    Conflict(Ulid),
}

impl EngineError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::MissingField(_) => "missing_field",
            EngineError::PastDate => "past_date",
            EngineError::PastTime => "past_time",
            EngineError::InvalidRange => "invalid_range",
            EngineError::OutsideOperatingHours => "outside_operating_hours",
            EngineError::RoomNotFound(_) => "room_not_found",
            EngineError::ReservationNotFound(_) => "reservation_not_found",
            EngineError::AlreadyExists(_) => "already_exists",
            EngineError::Maintenance(_) => "maintenance",
            EngineError::Conflict(_) => "conflict",
        }
    }

    /// Verdict vocabulary for error responses, where one applies.
    pub fn verdict_reason(&self) -> Option<VerdictReason> {
        match self {
            EngineError::PastDate | EngineError::PastTime => Some(VerdictReason::Past),
            EngineError::OutsideOperatingHours => Some(VerdictReason::OutsideHours),
            EngineError::Maintenance(_) => Some(VerdictReason::Maintenance),
            EngineError::Conflict(_) => Some(VerdictReason::Conflict),
            _ => None,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MissingField(field) => write!(f, "missing required field: {field}"),
            EngineError::PastDate => write!(f, "date is in the past"),
            EngineError::PastTime => write!(f, "start time has already passed"),
            EngineError::InvalidRange => write!(f, "end time must be after start time"),
            EngineError::OutsideOperatingHours => {
                write!(f, "window falls outside operating hours")
            }
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::ReservationNotFound(id) => write!(f, "reservation not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "room already registered: {id}"),
            EngineError::Maintenance(id) => write!(f, "room under maintenance: {id}"),
            EngineError::Conflict(id) => write!(f, "conflicts with reservation: {id}"),
        }
    }
}

impl std::error::Error for EngineError {}
