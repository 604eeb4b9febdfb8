use anyhow::{Context, anyhow};
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use dormex_core::AppError;
use dormex_models::{ComplaintId, StudentId, UserId};

use crate::modules::complaints::model::{
    Complaint, ComplaintCategory, ComplaintRecord, ComplaintStatus, CreateComplaintDto,
    UpdateComplaintDto, UpdateComplaintStatusDto,
};
use crate::modules::students::service::StudentService;
use crate::modules::users::service::UserService;

const COMPLAINT_COLUMNS: &str = "id, student_id, category, title, description, status, \
     admin_remarks, assigned_to, resolved_at, created_at, updated_at";

fn record_query(filter: &str, order: &str) -> String {
    format!(
        "SELECT c.id, c.student_id, c.category, c.title, c.description, c.status, \
                c.admin_remarks, c.assigned_to, c.resolved_at, c.created_at, c.updated_at, \
                u.name AS student_name, s.roll_number AS student_roll_number, \
                a.name AS assigned_to_name \
         FROM complaints c \
         JOIN students s ON s.id = c.student_id \
         JOIN users u ON u.id = s.user_id \
         LEFT JOIN users a ON a.id = c.assigned_to \
         {filter} \
         ORDER BY c.created_at {order}"
    )
}

pub struct ComplaintService;

impl ComplaintService {
    async fn fetch_record(db: &PgPool, id: ComplaintId) -> Result<ComplaintRecord, AppError> {
        sqlx::query_as::<_, ComplaintRecord>(&record_query("WHERE c.id = $1", "DESC"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch complaint")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found_entity("Complaint", "id", id))
    }

    async fn lock_complaint(
        conn: &mut PgConnection,
        id: ComplaintId,
    ) -> Result<Complaint, AppError> {
        sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found_entity("Complaint", "id", id))
    }

    async fn save_complaint(conn: &mut PgConnection, complaint: &Complaint) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE complaints \
             SET status = $2, admin_remarks = $3, assigned_to = $4, resolved_at = $5, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(complaint.id)
        .bind(complaint.status)
        .bind(&complaint.admin_remarks)
        .bind(complaint.assigned_to)
        .bind(complaint.resolved_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Student profile for the signed-in account.
    async fn student_for_user(db: &PgPool, user_id: UserId) -> Result<StudentId, AppError> {
        StudentService::find_by_user_id(db, user_id)
            .await?
            .map(|student| student.id)
            .ok_or_else(|| AppError::bad_request(anyhow!("Student profile not found")))
    }

    #[instrument(skip(db, dto), fields(user_id = %user_id))]
    pub async fn create_complaint(
        db: &PgPool,
        user_id: UserId,
        dto: CreateComplaintDto,
    ) -> Result<ComplaintRecord, AppError> {
        let student_id = Self::student_for_user(db, user_id).await?;

        let id: ComplaintId = sqlx::query_scalar(
            "INSERT INTO complaints (student_id, category, title, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(student_id)
        .bind(dto.category)
        .bind(&dto.title)
        .bind(&dto.description)
        .fetch_one(db)
        .await?;

        info!(complaint_id = %id, category = dto.category.as_str(), "Complaint filed");
        Self::fetch_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_my_complaints(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<ComplaintRecord>, AppError> {
        let student_id = Self::student_for_user(db, user_id).await?;
        Self::get_complaints_by_student(db, student_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_all_complaints(db: &PgPool) -> Result<Vec<ComplaintRecord>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&record_query("", "DESC"))
            .fetch_all(db)
            .await
            .context("Failed to fetch complaints")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    #[instrument(skip(db))]
    pub async fn get_complaints_by_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<ComplaintRecord>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&record_query("WHERE c.student_id = $1", "DESC"))
            .bind(student_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch complaints by student")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    #[instrument(skip(db))]
    pub async fn get_complaints_by_status(
        db: &PgPool,
        status: ComplaintStatus,
    ) -> Result<Vec<ComplaintRecord>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&record_query("WHERE c.status = $1", "DESC"))
            .bind(status)
            .fetch_all(db)
            .await
            .context("Failed to fetch complaints by status")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    #[instrument(skip(db))]
    pub async fn get_complaints_by_category(
        db: &PgPool,
        category: ComplaintCategory,
    ) -> Result<Vec<ComplaintRecord>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&record_query("WHERE c.category = $1", "DESC"))
            .bind(category)
            .fetch_all(db)
            .await
            .context("Failed to fetch complaints by category")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    /// OPEN and IN_PROGRESS complaints, oldest first.
    #[instrument(skip(db))]
    pub async fn get_pending_complaints(db: &PgPool) -> Result<Vec<ComplaintRecord>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&record_query("WHERE c.status IN ('OPEN', 'IN_PROGRESS')", "ASC"))
            .fetch_all(db)
            .await
            .context("Failed to fetch pending complaints")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    /// Latest complaints for the dashboard.
    #[instrument(skip(db))]
    pub async fn get_recent_complaints(
        db: &PgPool,
        limit: i64,
    ) -> Result<Vec<ComplaintRecord>, AppError> {
        let sql = format!("{} LIMIT $1", record_query("", "DESC"));
        let complaints = sqlx::query_as::<_, ComplaintRecord>(&sql)
            .bind(limit)
            .fetch_all(db)
            .await
            .context("Failed to fetch recent complaints")
            .map_err(AppError::database)?;

        Ok(complaints)
    }

    /// Fetches a complaint. When `viewer` is a student, the complaint must be
    /// one they filed.
    #[instrument(skip(db))]
    pub async fn get_complaint(
        db: &PgPool,
        id: ComplaintId,
        viewer: Option<UserId>,
    ) -> Result<ComplaintRecord, AppError> {
        let record = Self::fetch_record(db, id).await?;

        if let Some(user_id) = viewer {
            let owner = StudentService::find_by_user_id(db, user_id).await?;
            if owner.map(|s| s.id) != Some(record.complaint.student_id) {
                return Err(AppError::forbidden("You can only view your own complaints"));
            }
        }

        Ok(record)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_complaint(
        db: &PgPool,
        id: ComplaintId,
        dto: UpdateComplaintDto,
    ) -> Result<ComplaintRecord, AppError> {
        if let Some(assignee) = dto.assigned_to {
            if UserService::find_by_id(db, assignee).await?.is_none() {
                return Err(AppError::not_found_entity("User", "id", assignee));
            }
        }

        let mut tx = db.begin().await?;
        let mut complaint = Self::lock_complaint(&mut tx, id).await?;
        complaint.apply(&dto, Utc::now());
        Self::save_complaint(&mut tx, &complaint).await?;
        tx.commit().await?;

        info!(complaint_id = %id, status = complaint.status.as_str(), "Complaint updated");
        Self::fetch_record(db, id).await
    }

    #[instrument(skip(db, dto), fields(status = dto.status.as_str()))]
    pub async fn update_status(
        db: &PgPool,
        id: ComplaintId,
        dto: UpdateComplaintStatusDto,
    ) -> Result<ComplaintRecord, AppError> {
        let mut tx = db.begin().await?;
        let mut complaint = Self::lock_complaint(&mut tx, id).await?;
        complaint.set_status(dto.status, Utc::now());
        if let Some(remarks) = dto.admin_remarks {
            complaint.admin_remarks = Some(remarks);
        }
        Self::save_complaint(&mut tx, &complaint).await?;
        tx.commit().await?;

        info!(complaint_id = %id, "Complaint status changed");
        Self::fetch_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_complaint(db: &PgPool, id: ComplaintId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found_entity("Complaint", "id", id));
        }

        info!(complaint_id = %id, "Complaint deleted");
        Ok(())
    }
}
