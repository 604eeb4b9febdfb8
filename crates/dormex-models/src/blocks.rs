//! Hostel blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use dormex_core::AppError;

use crate::ids::BlockId;

#[derive(Debug, Clone, FromRow)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub description: Option<String>,
    pub total_floors: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A block with its room counts. `occupied_rooms` counts rooms that are
/// OCCUPIED or FULL.
#[derive(Debug, Clone, FromRow)]
pub struct BlockWithStats {
    #[sqlx(flatten)]
    pub block: Block,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlockResponse {
    pub id: BlockId,
    pub name: String,
    pub description: Option<String>,
    pub total_floors: Option<i32>,
    pub active: bool,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BlockWithStats> for BlockResponse {
    fn from(row: BlockWithStats) -> Self {
        Self {
            id: row.block.id,
            name: row.block.name,
            description: row.block.description,
            total_floors: row.block.total_floors,
            active: row.block.active,
            total_rooms: row.total_rooms,
            occupied_rooms: row.occupied_rooms,
            created_at: row.block.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBlockDto {
    #[validate(length(min = 1, max = 50, message = "Block name is required (max 50 characters)"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Total floors must be at least 1"))]
    pub total_floors: Option<i32>,
}

/// Only provided fields change.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateBlockDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Total floors must be at least 1"))]
    pub total_floors: Option<i32>,
}

/// Blocks can only be deleted once every room in them has been removed.
pub fn ensure_block_empty(room_count: i64) -> Result<(), AppError> {
    if room_count > 0 {
        return Err(AppError::conflict("Cannot delete block with existing rooms"));
    }
    Ok(())
}
