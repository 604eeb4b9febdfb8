//! Rooms and the occupancy state machine.
//!
//! A room's status is never stored. It is derived from
//! `(current_occupancy, capacity, under_maintenance)`:
//!
//! | condition                        | status              |
//! |----------------------------------|---------------------|
//! | `under_maintenance`              | `UNDER_MAINTENANCE` |
//! | `current_occupancy >= capacity`  | `FULL`              |
//! | `current_occupancy > 0`          | `OCCUPIED`          |
//! | otherwise                        | `AVAILABLE`         |
//!
//! The maintenance flag is sticky: occupancy changes do not clear it, only an
//! explicit status change does. All mutations keep
//! `0 <= current_occupancy <= capacity`; the `rooms` table enforces the same
//! bound with a CHECK constraint.

use chrono::{DateTime, Utc};
use dormex_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{BlockId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Full,
    UnderMaintenance,
}

impl RoomStatus {
    pub fn derive(current_occupancy: i32, capacity: i32, under_maintenance: bool) -> Self {
        if under_maintenance {
            Self::UnderMaintenance
        } else if current_occupancy >= capacity {
            Self::Full
        } else if current_occupancy > 0 {
            Self::Occupied
        } else {
            Self::Available
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Full => "FULL",
            Self::UnderMaintenance => "UNDER_MAINTENANCE",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("Room is at full capacity")]
    CapacityExceeded,
    #[error("Room is already empty")]
    AlreadyEmpty,
    #[error("Capacity cannot be less than current occupancy ({occupancy})")]
    InvalidCapacity { capacity: i32, occupancy: i32 },
    #[error("Cannot delete room with occupants")]
    RoomOccupied,
}

impl From<OccupancyError> for AppError {
    fn from(err: OccupancyError) -> Self {
        AppError::invalid_state(err.to_string())
    }
}

/// A row of the `rooms` table.
#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: RoomId,
    pub block_id: BlockId,
    pub room_number: String,
    pub floor: i32,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub room_type: Option<String>,
    pub amenities: Option<String>,
    pub under_maintenance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn status(&self) -> RoomStatus {
        RoomStatus::derive(self.current_occupancy, self.capacity, self.under_maintenance)
    }

    pub fn available_slots(&self) -> i32 {
        (self.capacity - self.current_occupancy).max(0)
    }

    /// Vacant rooms are empty and not under maintenance.
    pub fn is_vacant(&self) -> bool {
        self.status() == RoomStatus::Available
    }

    pub fn increment(&mut self) -> Result<(), OccupancyError> {
        if self.current_occupancy >= self.capacity {
            return Err(OccupancyError::CapacityExceeded);
        }
        self.current_occupancy += 1;
        Ok(())
    }

    pub fn decrement(&mut self) -> Result<(), OccupancyError> {
        if self.current_occupancy <= 0 {
            return Err(OccupancyError::AlreadyEmpty);
        }
        self.current_occupancy -= 1;
        Ok(())
    }

    pub fn set_capacity(&mut self, capacity: i32) -> Result<(), OccupancyError> {
        if capacity < self.current_occupancy {
            return Err(OccupancyError::InvalidCapacity {
                capacity,
                occupancy: self.current_occupancy,
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// `UNDER_MAINTENANCE` sets the override; any other status releases it and
    /// the room falls back to the status its occupancy implies.
    pub fn set_status(&mut self, status: RoomStatus) {
        self.under_maintenance = status == RoomStatus::UnderMaintenance;
    }

    pub fn ensure_deletable(&self) -> Result<(), OccupancyError> {
        if self.current_occupancy > 0 {
            return Err(OccupancyError::RoomOccupied);
        }
        Ok(())
    }
}

/// Room joined with its block's name.
#[derive(Debug, Clone, FromRow)]
pub struct RoomWithBlock {
    #[sqlx(flatten)]
    pub room: Room,
    pub block_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    pub id: RoomId,
    pub block_id: BlockId,
    pub block_name: String,
    pub room_number: String,
    pub floor: i32,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub available_slots: i32,
    pub status: RoomStatus,
    pub room_type: Option<String>,
    pub amenities: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RoomWithBlock> for RoomResponse {
    fn from(row: RoomWithBlock) -> Self {
        let status = row.room.status();
        let available_slots = row.room.available_slots();
        let room = row.room;
        Self {
            id: room.id,
            block_id: room.block_id,
            block_name: row.block_name,
            room_number: room.room_number,
            floor: room.floor,
            capacity: room.capacity,
            current_occupancy: room.current_occupancy,
            available_slots,
            status,
            room_type: room.room_type,
            amenities: room.amenities,
            created_at: room.created_at,
        }
    }
}

fn default_capacity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoomDto {
    pub block_id: BlockId,
    #[validate(length(min = 1, max = 20, message = "Room number is required (max 20 characters)"))]
    pub room_number: String,
    #[validate(range(min = 1, message = "Floor must be at least 1"))]
    pub floor: i32,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    #[validate(length(max = 50))]
    pub room_type: Option<String>,
    #[validate(length(max = 255))]
    pub amenities: Option<String>,
}

/// Only provided fields change.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateRoomDto {
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(length(max = 50))]
    pub room_type: Option<String>,
    #[validate(length(max = 255))]
    pub amenities: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateRoomStatusDto {
    pub status: RoomStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(capacity: i32, occupancy: i32) -> Room {
        Room {
            id: RoomId::new(),
            block_id: BlockId::new(),
            room_number: "A-101".to_string(),
            floor: 1,
            capacity,
            current_occupancy: occupancy,
            room_type: Some("Double".to_string()),
            amenities: None,
            under_maintenance: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_derive_status() {
        assert_eq!(RoomStatus::derive(0, 2, false), RoomStatus::Available);
        assert_eq!(RoomStatus::derive(1, 2, false), RoomStatus::Occupied);
        assert_eq!(RoomStatus::derive(2, 2, false), RoomStatus::Full);
        assert_eq!(RoomStatus::derive(1, 2, true), RoomStatus::UnderMaintenance);
    }

    #[test]
    fn test_fill_room_to_capacity() {
        let mut r = room(2, 0);
        r.increment().unwrap();
        assert_eq!(r.status(), RoomStatus::Occupied);
        r.increment().unwrap();
        assert_eq!(r.status(), RoomStatus::Full);

        assert_eq!(r.increment(), Err(OccupancyError::CapacityExceeded));
        assert_eq!(r.current_occupancy, 2);
        assert_eq!(r.status(), RoomStatus::Full);
    }

    #[test]
    fn test_decrement_empty_room_fails() {
        let mut r = room(3, 0);
        assert_eq!(r.decrement(), Err(OccupancyError::AlreadyEmpty));
        assert_eq!(r.current_occupancy, 0);
    }

    #[test]
    fn test_increment_then_decrement_restores_state() {
        for occupancy in 0..3 {
            let mut r = room(3, occupancy);
            let before = (r.current_occupancy, r.status());
            r.increment().unwrap();
            r.decrement().unwrap();
            assert_eq!((r.current_occupancy, r.status()), before);
        }
    }

    #[test]
    fn test_maintenance_is_sticky() {
        let mut r = room(2, 1);
        r.set_status(RoomStatus::UnderMaintenance);

        r.increment().unwrap();
        assert_eq!(r.status(), RoomStatus::UnderMaintenance);
        r.decrement().unwrap();
        r.decrement().unwrap();
        assert_eq!(r.status(), RoomStatus::UnderMaintenance);
        assert!(!r.is_vacant());

        r.set_status(RoomStatus::Available);
        assert_eq!(r.status(), RoomStatus::Available);
        assert!(r.is_vacant());
    }

    #[test]
    fn test_releasing_maintenance_reports_derived_status() {
        let mut r = room(2, 1);
        r.set_status(RoomStatus::UnderMaintenance);
        assert_eq!(r.status(), RoomStatus::UnderMaintenance);

        r.set_status(RoomStatus::Available);
        assert!(!r.under_maintenance);
        assert_eq!(r.status(), RoomStatus::Occupied);
        assert_eq!(r.current_occupancy, 1);

        r.set_status(RoomStatus::Full);
        assert_eq!(r.status(), RoomStatus::Occupied);
    }

    #[test]
    fn test_set_capacity_fails_only_below_occupancy() {
        let mut r = room(4, 3);
        assert!(matches!(
            r.set_capacity(2),
            Err(OccupancyError::InvalidCapacity { capacity: 2, occupancy: 3 })
        ));
        assert_eq!(r.capacity, 4);

        r.set_capacity(3).unwrap();
        assert_eq!(r.status(), RoomStatus::Full);

        r.set_capacity(6).unwrap();
        assert_eq!(r.status(), RoomStatus::Occupied);
        assert_eq!(r.available_slots(), 3);
    }

    #[test]
    fn test_occupied_room_cannot_be_deleted() {
        assert_eq!(room(2, 1).ensure_deletable(), Err(OccupancyError::RoomOccupied));
        assert!(room(2, 0).ensure_deletable().is_ok());
    }

    #[test]
    fn test_occupancy_error_maps_to_invalid_state() {
        let err: AppError = OccupancyError::CapacityExceeded.into();
        assert_eq!(err.kind, dormex_core::ErrorKind::InvalidState);
        assert_eq!(err.message(), "Room is at full capacity");
    }

    #[test]
    fn test_create_room_capacity_defaults_to_one() {
        let json = format!(
            r#"{{"block_id":"{}","room_number":"B-12","floor":2}}"#,
            BlockId::new()
        );
        let dto: CreateRoomDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.capacity, 1);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_room_rejects_floor_zero() {
        let dto = CreateRoomDto {
            block_id: BlockId::new(),
            room_number: "G-1".to_string(),
            floor: 0,
            capacity: 1,
            room_type: None,
            amenities: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("floor"));
    }

    #[test]
    fn test_response_reports_derived_status() {
        let response = RoomResponse::from(RoomWithBlock {
            room: room(2, 2),
            block_name: "A".to_string(),
        });
        assert_eq!(response.status, RoomStatus::Full);
        assert_eq!(response.available_slots, 0);
        assert_eq!(response.block_name, "A");
    }
}
