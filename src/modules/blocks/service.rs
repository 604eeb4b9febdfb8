use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, instrument};

use dormex_core::AppError;
use dormex_models::BlockId;

use crate::modules::blocks::model::{
    Block, BlockWithStats, CreateBlockDto, UpdateBlockDto, ensure_block_empty,
};

const BLOCK_COLUMNS: &str =
    "b.id, b.name, b.description, b.total_floors, b.active, b.created_at, b.updated_at";

/// Blocks joined with their room counts. `occupied_rooms` counts rooms whose
/// derived status is OCCUPIED or FULL.
fn stats_query(filter: &str) -> String {
    format!(
        "SELECT {BLOCK_COLUMNS}, \
                COUNT(r.id) AS total_rooms, \
                COUNT(r.id) FILTER (WHERE NOT r.under_maintenance AND r.current_occupancy > 0) \
                    AS occupied_rooms \
         FROM blocks b \
         LEFT JOIN rooms r ON r.block_id = b.id \
         {filter} \
         GROUP BY b.id \
         ORDER BY b.name"
    )
}

pub struct BlockService;

impl BlockService {
    async fn name_taken(
        db: &PgPool,
        name: &str,
        except: Option<BlockId>,
    ) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blocks WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(db)
        .await
        .context("Failed to check block name")
        .map_err(AppError::database)?;

        Ok(taken)
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_block(db: &PgPool, dto: CreateBlockDto) -> Result<BlockWithStats, AppError> {
        if Self::name_taken(db, &dto.name, None).await? {
            return Err(AppError::conflict("Block name already exists"));
        }

        let block = sqlx::query_as::<_, Block>(
            "INSERT INTO blocks (name, description, total_floors) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, description, total_floors, active, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.total_floors)
        .fetch_one(db)
        .await?;

        info!(block_id = %block.id, "Block created");
        Ok(BlockWithStats {
            block,
            total_rooms: 0,
            occupied_rooms: 0,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_all_blocks(db: &PgPool) -> Result<Vec<BlockWithStats>, AppError> {
        let blocks = sqlx::query_as::<_, BlockWithStats>(&stats_query(""))
            .fetch_all(db)
            .await
            .context("Failed to fetch blocks")
            .map_err(AppError::database)?;

        Ok(blocks)
    }

    #[instrument(skip(db))]
    pub async fn get_active_blocks(db: &PgPool) -> Result<Vec<BlockWithStats>, AppError> {
        let blocks = sqlx::query_as::<_, BlockWithStats>(&stats_query("WHERE b.active"))
            .fetch_all(db)
            .await
            .context("Failed to fetch active blocks")
            .map_err(AppError::database)?;

        Ok(blocks)
    }

    #[instrument(skip(db))]
    pub async fn get_block(db: &PgPool, id: BlockId) -> Result<BlockWithStats, AppError> {
        sqlx::query_as::<_, BlockWithStats>(&stats_query("WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch block")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found_entity("Block", "id", id))
    }

    #[instrument(skip(db))]
    pub async fn block_exists(db: &PgPool, id: BlockId) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM blocks WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await
            .context("Failed to check block")
            .map_err(AppError::database)?;

        Ok(exists)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_block(
        db: &PgPool,
        id: BlockId,
        dto: UpdateBlockDto,
    ) -> Result<BlockWithStats, AppError> {
        if let Some(name) = &dto.name {
            if Self::name_taken(db, name, Some(id)).await? {
                return Err(AppError::conflict("Block name already exists"));
            }
        }

        let updated = sqlx::query(
            "UPDATE blocks SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                total_floors = COALESCE($4, total_floors), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.total_floors)
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found_entity("Block", "id", id));
        }

        Self::get_block(db, id).await
    }

    /// Flips `active`. Rooms in the block are untouched.
    #[instrument(skip(db))]
    pub async fn toggle_block_status(db: &PgPool, id: BlockId) -> Result<BlockWithStats, AppError> {
        let updated = sqlx::query(
            "UPDATE blocks SET active = NOT active, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await
        .context("Failed to toggle block status")
        .map_err(AppError::database)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found_entity("Block", "id", id));
        }

        Self::get_block(db, id).await
    }

    /// Deletes an empty block. The block row is locked first so a concurrent
    /// room insert cannot slip in between the count and the delete.
    #[instrument(skip(db))]
    pub async fn delete_block(db: &PgPool, id: BlockId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let locked: Option<BlockId> =
            sqlx::query_scalar("SELECT id FROM blocks WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::not_found_entity("Block", "id", id));
        }

        let room_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE block_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        ensure_block_empty(room_count)?;

        sqlx::query("DELETE FROM blocks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(block_id = %id, "Block deleted");
        Ok(())
    }
}
