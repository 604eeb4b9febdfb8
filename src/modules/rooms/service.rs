//! Room queries and occupancy mutations.
//!
//! Every mutation loads the room with `SELECT ... FOR UPDATE`, applies the
//! rule from [`Room`] to the locked values and writes the result in the same
//! transaction. Concurrent increments against the last free slot therefore
//! serialize, and the loser sees `Room is at full capacity`.

use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use dormex_core::AppError;
use dormex_models::{BlockId, RoomId};

use crate::modules::blocks::service::BlockService;
use crate::modules::rooms::model::{
    CreateRoomDto, Room, RoomStatus, RoomWithBlock, UpdateRoomDto,
};

const ROOM_COLUMNS: &str = "id, block_id, room_number, floor, capacity, current_occupancy, \
     room_type, amenities, under_maintenance, created_at, updated_at";

fn joined_query(filter: &str) -> String {
    format!(
        "SELECT r.id, r.block_id, r.room_number, r.floor, r.capacity, r.current_occupancy, \
                r.room_type, r.amenities, r.under_maintenance, r.created_at, r.updated_at, \
                b.name AS block_name \
         FROM rooms r \
         JOIN blocks b ON b.id = r.block_id \
         {filter} \
         ORDER BY b.name, r.floor, r.room_number"
    )
}

/// Rooms with no occupants and no maintenance override.
const VACANT: &str = "NOT r.under_maintenance AND r.current_occupancy = 0";

pub struct RoomService;

impl RoomService {
    /// Locks the room row if it exists. Callers must hold a transaction.
    pub(crate) async fn find_room_for_update(
        conn: &mut PgConnection,
        id: RoomId,
    ) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(room)
    }

    pub(crate) async fn lock_room(conn: &mut PgConnection, id: RoomId) -> Result<Room, AppError> {
        Self::find_room_for_update(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found_entity("Room", "id", id))
    }

    /// Writes back everything a mutation on a locked [`Room`] can change.
    pub(crate) async fn save_room(conn: &mut PgConnection, room: &Room) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE rooms SET \
                capacity = $2, \
                current_occupancy = $3, \
                room_type = $4, \
                amenities = $5, \
                under_maintenance = $6, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(room.id)
        .bind(room.capacity)
        .bind(room.current_occupancy)
        .bind(&room.room_type)
        .bind(&room.amenities)
        .bind(room.under_maintenance)
        .execute(conn)
        .await?;

        Ok(())
    }

    async fn fetch_joined(db: &PgPool, id: RoomId) -> Result<RoomWithBlock, AppError> {
        sqlx::query_as::<_, RoomWithBlock>(&joined_query("WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch room")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found_entity("Room", "id", id))
    }

    #[instrument(skip(db, dto), fields(block_id = %dto.block_id, room_number = %dto.room_number))]
    pub async fn create_room(db: &PgPool, dto: CreateRoomDto) -> Result<RoomWithBlock, AppError> {
        if !BlockService::block_exists(db, dto.block_id).await? {
            return Err(AppError::not_found_entity("Block", "id", dto.block_id));
        }

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM rooms WHERE block_id = $1 AND room_number = $2)",
        )
        .bind(dto.block_id)
        .bind(&dto.room_number)
        .fetch_one(db)
        .await
        .context("Failed to check room number")
        .map_err(AppError::database)?;
        if taken {
            return Err(AppError::conflict("Room number already exists in this block"));
        }

        let id: RoomId = sqlx::query_scalar(
            "INSERT INTO rooms (block_id, room_number, floor, capacity, room_type, amenities) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(dto.block_id)
        .bind(&dto.room_number)
        .bind(dto.floor)
        .bind(dto.capacity)
        .bind(&dto.room_type)
        .bind(&dto.amenities)
        .fetch_one(db)
        .await?;

        info!(room_id = %id, "Room created");
        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_all_rooms(db: &PgPool) -> Result<Vec<RoomWithBlock>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithBlock>(&joined_query(""))
            .fetch_all(db)
            .await
            .context("Failed to fetch rooms")
            .map_err(AppError::database)?;

        Ok(rooms)
    }

    #[instrument(skip(db))]
    pub async fn get_room(db: &PgPool, id: RoomId) -> Result<RoomWithBlock, AppError> {
        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_rooms_by_block(
        db: &PgPool,
        block_id: BlockId,
    ) -> Result<Vec<RoomWithBlock>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithBlock>(&joined_query("WHERE r.block_id = $1"))
            .bind(block_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch rooms by block")
            .map_err(AppError::database)?;

        Ok(rooms)
    }

    #[instrument(skip(db))]
    pub async fn get_rooms_by_floor(
        db: &PgPool,
        block_id: BlockId,
        floor: i32,
    ) -> Result<Vec<RoomWithBlock>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithBlock>(&joined_query(
            "WHERE r.block_id = $1 AND r.floor = $2",
        ))
        .bind(block_id)
        .bind(floor)
        .fetch_all(db)
        .await
        .context("Failed to fetch rooms by floor")
        .map_err(AppError::database)?;

        Ok(rooms)
    }

    #[instrument(skip(db))]
    pub async fn get_vacant_rooms(db: &PgPool) -> Result<Vec<RoomWithBlock>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithBlock>(&joined_query(&format!("WHERE {VACANT}")))
            .fetch_all(db)
            .await
            .context("Failed to fetch vacant rooms")
            .map_err(AppError::database)?;

        Ok(rooms)
    }

    #[instrument(skip(db))]
    pub async fn get_vacant_rooms_by_block(
        db: &PgPool,
        block_id: BlockId,
    ) -> Result<Vec<RoomWithBlock>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithBlock>(&joined_query(&format!(
            "WHERE r.block_id = $1 AND {VACANT}"
        )))
        .bind(block_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch vacant rooms by block")
        .map_err(AppError::database)?;

        Ok(rooms)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_room(
        db: &PgPool,
        id: RoomId,
        dto: UpdateRoomDto,
    ) -> Result<RoomWithBlock, AppError> {
        let mut tx = db.begin().await?;
        let mut room = Self::lock_room(&mut tx, id).await?;

        if let Some(capacity) = dto.capacity {
            room.set_capacity(capacity)?;
        }
        if let Some(room_type) = dto.room_type {
            room.room_type = Some(room_type);
        }
        if let Some(amenities) = dto.amenities {
            room.amenities = Some(amenities);
        }

        Self::save_room(&mut tx, &room).await?;
        tx.commit().await?;

        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn update_room_status(
        db: &PgPool,
        id: RoomId,
        status: RoomStatus,
    ) -> Result<RoomWithBlock, AppError> {
        let mut tx = db.begin().await?;
        let mut room = Self::lock_room(&mut tx, id).await?;

        room.set_status(status);

        Self::save_room(&mut tx, &room).await?;
        tx.commit().await?;

        info!(room_id = %id, status = %room.status(), "Room status updated");
        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn increment_occupancy(db: &PgPool, id: RoomId) -> Result<RoomWithBlock, AppError> {
        let mut tx = db.begin().await?;
        let mut room = Self::lock_room(&mut tx, id).await?;

        room.increment()?;

        Self::save_room(&mut tx, &room).await?;
        tx.commit().await?;

        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn decrement_occupancy(db: &PgPool, id: RoomId) -> Result<RoomWithBlock, AppError> {
        let mut tx = db.begin().await?;
        let mut room = Self::lock_room(&mut tx, id).await?;

        room.decrement()?;

        Self::save_room(&mut tx, &room).await?;
        tx.commit().await?;

        Self::fetch_joined(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_room(db: &PgPool, id: RoomId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;
        let room = Self::lock_room(&mut tx, id).await?;

        room.ensure_deletable()?;

        sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(room_id = %id, "Room deleted");
        Ok(())
    }
}
