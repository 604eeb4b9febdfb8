//! Admin dashboard aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::complaints::ComplaintResponse;
use crate::ids::BlockId;
use crate::students::StudentResponse;

/// `occupied / capacity` as a percentage rounded to two decimals. Zero when
/// there is no capacity.
pub fn occupancy_rate(occupied: i64, capacity: i64) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    let rate = occupied as f64 / capacity as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_students: i64,
    pub active_students: i64,
    /// Active blocks only.
    pub total_blocks: i64,
    pub total_rooms: i64,
    pub available_rooms: i64,
    /// OCCUPIED plus FULL.
    pub occupied_rooms: i64,
    pub total_complaints: i64,
    pub open_complaints: i64,
    pub in_progress_complaints: i64,
    /// RESOLVED plus CLOSED.
    pub resolved_complaints: i64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentActivity {
    pub recent_complaints: Vec<ComplaintResponse>,
    pub recent_students: Vec<StudentResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentActivityParams {
    /// Defaults to 5.
    pub limit: Option<i64>,
}

impl RecentActivityParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(5).clamp(1, 50)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct BlockOccupancyRow {
    pub block_id: BlockId,
    pub block_name: String,
    pub total_rooms: i64,
    pub total_capacity: i64,
    pub current_occupancy: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlockOccupancy {
    pub block_id: BlockId,
    pub block_name: String,
    pub total_rooms: i64,
    pub total_capacity: i64,
    pub current_occupancy: i64,
    pub occupancy_rate: f64,
}

impl From<BlockOccupancyRow> for BlockOccupancy {
    fn from(row: BlockOccupancyRow) -> Self {
        Self {
            occupancy_rate: occupancy_rate(row.current_occupancy, row.total_capacity),
            block_id: row.block_id,
            block_name: row.block_name,
            total_rooms: row.total_rooms,
            total_capacity: row.total_capacity,
            current_occupancy: row.current_occupancy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintSummary {
    pub total: i64,
    /// Every status appears, with zero counts included.
    pub by_status: BTreeMap<String, i64>,
    /// Only categories with at least one complaint appear.
    pub by_category: BTreeMap<String, i64>,
}
