//! Students and their lifecycle.
//!
//! A student holds at most one room through `room_id`, a soft reference with
//! no foreign key. Only ACTIVE students may hold a room: leaving ACTIVE always
//! drops the reference, and LEFT/TRANSFERRED also stamp `leaving_date`.
//!
//! The lifecycle methods report which room reference was released or replaced
//! so the caller can move occupancy counters when the coupled occupancy policy
//! is in effect.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use dormex_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::ids::{RoomId, StudentId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "student_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Left,
    Transferred,
    Suspended,
}

impl StudentStatus {
    /// LEFT and TRANSFERRED end the stay and stamp `leaving_date`.
    pub fn ends_stay(&self) -> bool {
        matches!(self, Self::Left | Self::Transferred)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Cannot assign room to non-active student")]
    NotActive,
    #[error("Student has no room assigned")]
    NoRoomAssigned,
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        AppError::invalid_state(err.to_string())
    }
}

/// A row of the `students` table.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub roll_number: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub joining_date: NaiveDate,
    pub leaving_date: Option<NaiveDate>,
    pub room_id: Option<RoomId>,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Room reference change produced by a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomChange {
    pub released: Option<RoomId>,
    pub acquired: Option<RoomId>,
}

impl RoomChange {
    pub fn is_noop(&self) -> bool {
        self.released == self.acquired
    }
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// Points the student at `room_id`, replacing any previous room.
    pub fn assign_room(&mut self, room_id: RoomId) -> Result<RoomChange, LifecycleError> {
        if !self.is_active() {
            return Err(LifecycleError::NotActive);
        }
        let released = self.room_id.replace(room_id);
        Ok(RoomChange {
            released,
            acquired: Some(room_id),
        })
    }

    pub fn vacate_room(&mut self) -> Result<RoomChange, LifecycleError> {
        match self.room_id.take() {
            Some(room_id) => Ok(RoomChange {
                released: Some(room_id),
                acquired: None,
            }),
            None => Err(LifecycleError::NoRoomAssigned),
        }
    }

    pub fn change_status(&mut self, status: StudentStatus, today: NaiveDate) -> RoomChange {
        self.status = status;
        if status.ends_stay() {
            self.leaving_date = Some(today);
        }
        if status == StudentStatus::Active {
            return RoomChange::default();
        }
        RoomChange {
            released: self.room_id.take(),
            acquired: None,
        }
    }
}

/// Student joined with its user account and room number.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRecord {
    #[sqlx(flatten)]
    pub student: Student,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub room_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: StudentId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub joining_date: NaiveDate,
    pub leaving_date: Option<NaiveDate>,
    pub room_id: Option<RoomId>,
    pub room_number: Option<String>,
    pub status: StudentStatus,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentRecord> for StudentResponse {
    fn from(record: StudentRecord) -> Self {
        let s = record.student;
        // A stale room number is meaningless once the reference is gone.
        let room_number = s.room_id.and(record.room_number);
        Self {
            id: s.id,
            user_id: s.user_id,
            name: record.name,
            email: record.email,
            roll_number: s.roll_number,
            phone: s.phone,
            department: s.department,
            year: s.year,
            address: s.address,
            guardian_name: s.guardian_name,
            guardian_phone: s.guardian_phone,
            date_of_birth: s.date_of_birth,
            joining_date: s.joining_date,
            leaving_date: s.leaving_date,
            room_id: s.room_id,
            room_number,
            status: s.status,
            profile_picture: record.profile_picture,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// 10 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let valid = (10..=15).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message(Cow::from("Invalid phone number")))
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 20, message = "Roll number is required (max 20 characters)"))]
    pub roll_number: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 10))]
    pub year: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub guardian_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub guardian_phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Defaults to today.
    pub joining_date: Option<NaiveDate>,
}

/// Only provided fields change.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 10))]
    pub year: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub guardian_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub guardian_phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentStatusDto {
    pub status: StudentStatus,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignRoomDto {
    pub room_id: RoomId,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentSearchParams {
    /// Matched case-insensitively against name and roll number.
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(status: StudentStatus, room_id: Option<RoomId>) -> Student {
        Student {
            id: StudentId::new(),
            user_id: UserId::new(),
            roll_number: "R1".to_string(),
            phone: None,
            department: None,
            year: None,
            address: None,
            guardian_name: None,
            guardian_phone: None,
            date_of_birth: None,
            joining_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            leaving_date: None,
            room_id,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_assign_room_to_left_student_fails() {
        let mut s = student(StudentStatus::Left, None);
        assert_eq!(s.assign_room(RoomId::new()), Err(LifecycleError::NotActive));
        assert!(s.room_id.is_none());
    }

    #[test]
    fn test_reassign_reports_previous_room() {
        let first = RoomId::new();
        let second = RoomId::new();
        let mut s = student(StudentStatus::Active, None);

        let change = s.assign_room(first).unwrap();
        assert_eq!(change, RoomChange { released: None, acquired: Some(first) });

        let change = s.assign_room(second).unwrap();
        assert_eq!(change, RoomChange { released: Some(first), acquired: Some(second) });
        assert_eq!(s.room_id, Some(second));
    }

    #[test]
    fn test_reassign_same_room_is_noop() {
        let room = RoomId::new();
        let mut s = student(StudentStatus::Active, Some(room));
        assert!(s.assign_room(room).unwrap().is_noop());
    }

    #[test]
    fn test_leaving_clears_room_and_stamps_date() {
        for status in [StudentStatus::Left, StudentStatus::Transferred] {
            let room = RoomId::new();
            let mut s = student(StudentStatus::Active, Some(room));

            let change = s.change_status(status, today());
            assert_eq!(change.released, Some(room));
            assert!(s.room_id.is_none());
            assert_eq!(s.leaving_date, Some(today()));
        }
    }

    #[test]
    fn test_suspension_clears_room_without_leaving_date() {
        let room = RoomId::new();
        let mut s = student(StudentStatus::Active, Some(room));

        let change = s.change_status(StudentStatus::Suspended, today());
        assert_eq!(change.released, Some(room));
        assert!(s.room_id.is_none());
        assert!(s.leaving_date.is_none());
    }

    #[test]
    fn test_reactivation_keeps_nothing_to_release() {
        let mut s = student(StudentStatus::Suspended, None);
        let change = s.change_status(StudentStatus::Active, today());
        assert_eq!(change, RoomChange::default());
        assert!(s.is_active());
    }

    #[test]
    fn test_vacate_without_room_fails() {
        let mut s = student(StudentStatus::Active, None);
        assert_eq!(s.vacate_room(), Err(LifecycleError::NoRoomAssigned));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98765-43210").is_err());
    }

    #[test]
    fn test_create_student_dto_validation() {
        let dto = CreateStudentDto {
            name: "Alice".to_string(),
            email: "alice@dormex.com".to_string(),
            password: "secret1".to_string(),
            roll_number: "R1".to_string(),
            phone: Some("bad".to_string()),
            department: None,
            year: None,
            address: None,
            guardian_name: None,
            guardian_phone: None,
            date_of_birth: None,
            joining_date: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_lifecycle_error_maps_to_invalid_state() {
        let err: AppError = LifecycleError::NotActive.into();
        assert_eq!(err.kind, dormex_core::ErrorKind::InvalidState);
    }
}
