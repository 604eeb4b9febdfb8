//! Student complaints.
//!
//! Status transitions are unconstrained. Moving to RESOLVED stamps
//! `resolved_at`; moving anywhere else leaves an earlier stamp in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ComplaintId, StudentId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "complaint_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintCategory {
    Maintenance,
    Electrical,
    Plumbing,
    Cleanliness,
    Food,
    Internet,
    Furniture,
    Security,
    Other,
}

impl ComplaintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "MAINTENANCE",
            Self::Electrical => "ELECTRICAL",
            Self::Plumbing => "PLUMBING",
            Self::Cleanliness => "CLEANLINESS",
            Self::Food => "FOOD",
            Self::Internet => "INTERNET",
            Self::Furniture => "FURNITURE",
            Self::Security => "SECURITY",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "complaint_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// OPEN and IN_PROGRESS complaints still need attention.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

/// A row of the `complaints` table.
#[derive(Debug, Clone, FromRow)]
pub struct Complaint {
    pub id: ComplaintId,
    pub student_id: StudentId,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub admin_remarks: Option<String>,
    pub assigned_to: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    pub fn set_status(&mut self, status: ComplaintStatus, now: DateTime<Utc>) {
        self.status = status;
        if status == ComplaintStatus::Resolved {
            self.resolved_at = Some(now);
        }
    }

    /// Applies an admin update. Absent fields are left unchanged.
    pub fn apply(&mut self, update: &UpdateComplaintDto, now: DateTime<Utc>) {
        if let Some(status) = update.status {
            self.set_status(status, now);
        }
        if let Some(remarks) = &update.admin_remarks {
            self.admin_remarks = Some(remarks.clone());
        }
        if let Some(assignee) = update.assigned_to {
            self.assigned_to = Some(assignee);
        }
    }
}

/// Complaint joined with the filing student and the assignee's name.
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintRecord {
    #[sqlx(flatten)]
    pub complaint: Complaint,
    pub student_name: String,
    pub student_roll_number: String,
    pub assigned_to_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintResponse {
    pub id: ComplaintId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_roll_number: String,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub admin_remarks: Option<String>,
    pub assigned_to: Option<UserId>,
    pub assigned_to_name: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintRecord> for ComplaintResponse {
    fn from(record: ComplaintRecord) -> Self {
        let c = record.complaint;
        Self {
            id: c.id,
            student_id: c.student_id,
            student_name: record.student_name,
            student_roll_number: record.student_roll_number,
            category: c.category,
            title: c.title,
            description: c.description,
            status: c.status,
            admin_remarks: c.admin_remarks,
            assigned_to: c.assigned_to,
            assigned_to_name: record.assigned_to_name,
            resolved_at: c.resolved_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateComplaintDto {
    pub category: ComplaintCategory,
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Description is required (max 2000 characters)"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateComplaintDto {
    pub status: Option<ComplaintStatus>,
    #[validate(length(max = 1000))]
    pub admin_remarks: Option<String>,
    pub assigned_to: Option<UserId>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateComplaintStatusDto {
    pub status: ComplaintStatus,
    #[validate(length(max = 1000))]
    pub admin_remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn complaint() -> Complaint {
        Complaint {
            id: ComplaintId::new(),
            student_id: StudentId::new(),
            category: ComplaintCategory::Plumbing,
            title: "Leaking tap".to_string(),
            description: "Tap in A-101 bathroom leaks".to_string(),
            status: ComplaintStatus::Open,
            admin_remarks: None,
            assigned_to: None,
            resolved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolved_stamps_and_later_status_keeps_stamp() {
        let mut c = complaint();
        let resolved_at = Utc::now();

        c.set_status(ComplaintStatus::Resolved, resolved_at);
        assert_eq!(c.resolved_at, Some(resolved_at));

        c.set_status(ComplaintStatus::InProgress, resolved_at + Duration::hours(1));
        assert_eq!(c.status, ComplaintStatus::InProgress);
        assert_eq!(c.resolved_at, Some(resolved_at));
    }

    #[test]
    fn test_resolving_twice_restamps() {
        let mut c = complaint();
        let first = Utc::now();
        let second = first + Duration::minutes(5);

        c.set_status(ComplaintStatus::Resolved, first);
        c.set_status(ComplaintStatus::Resolved, second);
        assert_eq!(c.resolved_at, Some(second));
    }

    #[test]
    fn test_apply_only_touches_provided_fields() {
        let mut c = complaint();
        c.admin_remarks = Some("Plumber called".to_string());
        let assignee = UserId::new();

        c.apply(
            &UpdateComplaintDto {
                assigned_to: Some(assignee),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(c.status, ComplaintStatus::Open);
        assert_eq!(c.admin_remarks.as_deref(), Some("Plumber called"));
        assert_eq!(c.assigned_to, Some(assignee));
        assert!(c.resolved_at.is_none());
    }

    #[test]
    fn test_pending_statuses() {
        assert!(ComplaintStatus::Open.is_pending());
        assert!(ComplaintStatus::InProgress.is_pending());
        assert!(!ComplaintStatus::Resolved.is_pending());
        assert!(!ComplaintStatus::Closed.is_pending());
    }

    #[test]
    fn test_category_wire_format() {
        let category: ComplaintCategory = serde_json::from_str(r#""CLEANLINESS""#).unwrap();
        assert_eq!(category, ComplaintCategory::Cleanliness);
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            r#""IN_PROGRESS""#
        );
    }
}
