//! Read-only aggregates for the admin dashboard.

use std::collections::BTreeMap;

use anyhow::Context;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use dormex_core::AppError;
use dormex_models::{ComplaintResponse, ComplaintStatus, StudentResponse};

use crate::modules::complaints::service::ComplaintService;
use crate::modules::dashboard::model::{
    BlockOccupancy, BlockOccupancyRow, ComplaintSummary, DashboardStats, RecentActivity,
    occupancy_rate,
};
use crate::modules::students::service::StudentService;

#[derive(Debug, FromRow)]
struct StatCounts {
    total_students: i64,
    active_students: i64,
    total_blocks: i64,
    total_rooms: i64,
    available_rooms: i64,
    occupied_rooms: i64,
    total_capacity: i64,
    current_occupancy: i64,
    total_complaints: i64,
    open_complaints: i64,
    in_progress_complaints: i64,
    resolved_complaints: i64,
}

const STATS_QUERY: &str = "SELECT \
    (SELECT COUNT(*) FROM students) AS total_students, \
    (SELECT COUNT(*) FROM students WHERE status = 'ACTIVE') AS active_students, \
    (SELECT COUNT(*) FROM blocks WHERE active) AS total_blocks, \
    (SELECT COUNT(*) FROM rooms) AS total_rooms, \
    (SELECT COUNT(*) FROM rooms WHERE NOT under_maintenance AND current_occupancy = 0) \
        AS available_rooms, \
    (SELECT COUNT(*) FROM rooms WHERE NOT under_maintenance AND current_occupancy > 0) \
        AS occupied_rooms, \
    (SELECT COALESCE(SUM(capacity), 0)::BIGINT FROM rooms) AS total_capacity, \
    (SELECT COALESCE(SUM(current_occupancy), 0)::BIGINT FROM rooms) AS current_occupancy, \
    (SELECT COUNT(*) FROM complaints) AS total_complaints, \
    (SELECT COUNT(*) FROM complaints WHERE status = 'OPEN') AS open_complaints, \
    (SELECT COUNT(*) FROM complaints WHERE status = 'IN_PROGRESS') AS in_progress_complaints, \
    (SELECT COUNT(*) FROM complaints WHERE status IN ('RESOLVED', 'CLOSED')) \
        AS resolved_complaints";

/// Status counts with every status present, zeros included.
pub fn status_counts(rows: Vec<(ComplaintStatus, i64)>) -> BTreeMap<String, i64> {
    let mut by_status: BTreeMap<String, i64> = ComplaintStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), 0))
        .collect();

    for (status, count) in rows {
        by_status.insert(status.as_str().to_string(), count);
    }

    by_status
}

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(db))]
    pub async fn get_stats(db: &PgPool) -> Result<DashboardStats, AppError> {
        let counts = sqlx::query_as::<_, StatCounts>(STATS_QUERY)
            .fetch_one(db)
            .await
            .context("Failed to compute dashboard stats")
            .map_err(AppError::database)?;

        Ok(DashboardStats {
            total_students: counts.total_students,
            active_students: counts.active_students,
            total_blocks: counts.total_blocks,
            total_rooms: counts.total_rooms,
            available_rooms: counts.available_rooms,
            occupied_rooms: counts.occupied_rooms,
            total_complaints: counts.total_complaints,
            open_complaints: counts.open_complaints,
            in_progress_complaints: counts.in_progress_complaints,
            resolved_complaints: counts.resolved_complaints,
            occupancy_rate: occupancy_rate(counts.current_occupancy, counts.total_capacity),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_recent_activity(db: &PgPool, limit: i64) -> Result<RecentActivity, AppError> {
        let complaints = ComplaintService::get_recent_complaints(db, limit).await?;
        let students = StudentService::get_recent_students(db, limit).await?;

        Ok(RecentActivity {
            recent_complaints: complaints.into_iter().map(ComplaintResponse::from).collect(),
            recent_students: students.into_iter().map(StudentResponse::from).collect(),
        })
    }

    /// Occupancy per active block.
    #[instrument(skip(db))]
    pub async fn get_block_occupancy(db: &PgPool) -> Result<Vec<BlockOccupancy>, AppError> {
        let rows = sqlx::query_as::<_, BlockOccupancyRow>(
            "SELECT b.id AS block_id, b.name AS block_name, \
                    COUNT(r.id) AS total_rooms, \
                    COALESCE(SUM(r.capacity), 0)::BIGINT AS total_capacity, \
                    COALESCE(SUM(r.current_occupancy), 0)::BIGINT AS current_occupancy \
             FROM blocks b \
             LEFT JOIN rooms r ON r.block_id = b.id \
             WHERE b.active \
             GROUP BY b.id \
             ORDER BY b.name",
        )
        .fetch_all(db)
        .await
        .context("Failed to compute block occupancy")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(BlockOccupancy::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_complaint_summary(db: &PgPool) -> Result<ComplaintSummary, AppError> {
        let status_rows: Vec<(ComplaintStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM complaints GROUP BY status")
                .fetch_all(db)
                .await
                .context("Failed to count complaints by status")
                .map_err(AppError::database)?;

        let category_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category::TEXT, COUNT(*) FROM complaints GROUP BY category",
        )
        .fetch_all(db)
        .await
        .context("Failed to count complaints by category")
        .map_err(AppError::database)?;

        let by_status = status_counts(status_rows);
        let total = by_status.values().sum();

        Ok(ComplaintSummary {
            total,
            by_status,
            by_category: category_rows.into_iter().collect(),
        })
    }
}
