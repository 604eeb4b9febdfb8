//! Weekly mess menu.

use anyhow::{Context, anyhow};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use dormex_core::AppError;
use dormex_models::MenuId;

use crate::modules::menu::model::{CreateMenuDto, DayOfWeek, MealType, MessMenu, UpdateMenuDto};

const MENU_COLUMNS: &str = "id, day_of_week, meal_type, items, special_note, created_at, updated_at";

fn menu_not_found(day: DayOfWeek, meal: MealType) -> AppError {
    AppError::not_found(anyhow!(
        "Menu not found for {} {}",
        day.as_str(),
        meal.as_str()
    ))
}

pub struct MenuService;

impl MenuService {
    async fn save_menu(conn: &mut PgConnection, menu: &MessMenu) -> Result<MessMenu, AppError> {
        let menu = sqlx::query_as::<_, MessMenu>(&format!(
            "UPDATE mess_menus SET items = $2, special_note = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(menu.id)
        .bind(&menu.items)
        .bind(&menu.special_note)
        .fetch_one(conn)
        .await?;

        Ok(menu)
    }

    #[instrument(skip(db, dto), fields(day = dto.day_of_week.as_str(), meal = dto.meal_type.as_str()))]
    pub async fn create_menu(db: &PgPool, dto: CreateMenuDto) -> Result<MessMenu, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM mess_menus WHERE day_of_week = $1 AND meal_type = $2)",
        )
        .bind(dto.day_of_week)
        .bind(dto.meal_type)
        .fetch_one(db)
        .await
        .context("Failed to check menu")
        .map_err(AppError::database)?;

        if exists {
            return Err(AppError::conflict(format!(
                "Menu already exists for {} {}",
                dto.day_of_week.as_str(),
                dto.meal_type.as_str()
            )));
        }

        let menu = sqlx::query_as::<_, MessMenu>(&format!(
            "INSERT INTO mess_menus (day_of_week, meal_type, items, special_note) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(dto.day_of_week)
        .bind(dto.meal_type)
        .bind(dto.items.trim())
        .bind(&dto.special_note)
        .fetch_one(db)
        .await?;

        info!(menu_id = %menu.id, "Menu created");
        Ok(menu)
    }

    /// Every menu entry, ordered by day then meal.
    #[instrument(skip(db))]
    pub async fn get_all_menus(db: &PgPool) -> Result<Vec<MessMenu>, AppError> {
        let menus = sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus ORDER BY day_of_week, meal_type"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch menus")
        .map_err(AppError::database)?;

        Ok(menus)
    }

    #[instrument(skip(db))]
    pub async fn get_menu_by_day(db: &PgPool, day: DayOfWeek) -> Result<Vec<MessMenu>, AppError> {
        let menus = sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus WHERE day_of_week = $1 ORDER BY meal_type"
        ))
        .bind(day)
        .fetch_all(db)
        .await
        .context("Failed to fetch menu for day")
        .map_err(AppError::database)?;

        Ok(menus)
    }

    #[instrument(skip(db))]
    pub async fn get_menu_by_day_and_meal(
        db: &PgPool,
        day: DayOfWeek,
        meal: MealType,
    ) -> Result<MessMenu, AppError> {
        sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus WHERE day_of_week = $1 AND meal_type = $2"
        ))
        .bind(day)
        .bind(meal)
        .fetch_optional(db)
        .await
        .context("Failed to fetch menu")
        .map_err(AppError::database)?
        .ok_or_else(|| menu_not_found(day, meal))
    }

    #[instrument(skip(db))]
    pub async fn get_menu(db: &PgPool, id: MenuId) -> Result<MessMenu, AppError> {
        sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch menu")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found_entity("Menu", "id", id))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_menu(
        db: &PgPool,
        id: MenuId,
        dto: UpdateMenuDto,
    ) -> Result<MessMenu, AppError> {
        let mut tx = db.begin().await?;

        let mut menu = sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found_entity("Menu", "id", id))?;

        menu.apply(&dto);
        let menu = Self::save_menu(&mut tx, &menu).await?;
        tx.commit().await?;

        info!(menu_id = %id, "Menu updated");
        Ok(menu)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_menu_by_day_and_meal(
        db: &PgPool,
        day: DayOfWeek,
        meal: MealType,
        dto: UpdateMenuDto,
    ) -> Result<MessMenu, AppError> {
        let mut tx = db.begin().await?;

        let mut menu = sqlx::query_as::<_, MessMenu>(&format!(
            "SELECT {MENU_COLUMNS} FROM mess_menus \
             WHERE day_of_week = $1 AND meal_type = $2 \
             FOR UPDATE"
        ))
        .bind(day)
        .bind(meal)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| menu_not_found(day, meal))?;

        menu.apply(&dto);
        let menu = Self::save_menu(&mut tx, &menu).await?;
        tx.commit().await?;

        info!(menu_id = %menu.id, "Menu updated");
        Ok(menu)
    }

    #[instrument(skip(db))]
    pub async fn delete_menu(db: &PgPool, id: MenuId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM mess_menus WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found_entity("Menu", "id", id));
        }

        info!(menu_id = %id, "Menu deleted");
        Ok(())
    }
}
