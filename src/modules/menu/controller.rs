use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, DeletedResource, ErrorResponse};
use dormex_models::MenuId;

use crate::modules::menu::model::{
    CreateMenuDto, DailyMenuResponse, DayOfWeek, MealType, MenuResponse, MessMenu, UpdateMenuDto,
    weekly_menu,
};
use crate::modules::menu::service::MenuService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn daily(day: DayOfWeek, menus: Vec<MessMenu>) -> DailyMenuResponse {
    DailyMenuResponse {
        day,
        meals: menus.into_iter().map(MenuResponse::from).collect(),
    }
}

/// Today's meals, by the server's UTC date
#[utoipa::path(
    get,
    path = "/api/menu/today",
    responses(
        (status = 200, description = "Meals for today", body = DailyMenuResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn get_today_menu(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DailyMenuResponse>>, AppError> {
    let today = DayOfWeek::of(Utc::now().date_naive());
    let menus = MenuService::get_menu_by_day(&state.db, today).await?;
    Ok(Json(ApiResponse::success(daily(today, menus))))
}

/// The whole week, Monday first
///
/// Always returns seven day buckets; days without entries have no meals.
#[utoipa::path(
    get,
    path = "/api/menu/weekly",
    responses(
        (status = 200, description = "Seven day buckets", body = Vec<DailyMenuResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn get_weekly_menu(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyMenuResponse>>>, AppError> {
    let menus = MenuService::get_all_menus(&state.db).await?;
    Ok(Json(ApiResponse::success(weekly_menu(menus))))
}

#[utoipa::path(
    get,
    path = "/api/menu/day/{day}",
    params(("day" = DayOfWeek, Path, description = "Day of week")),
    responses(
        (status = 200, description = "Meals for the day", body = DailyMenuResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn get_menu_by_day(
    State(state): State<AppState>,
    Path(day): Path<DayOfWeek>,
) -> Result<Json<ApiResponse<DailyMenuResponse>>, AppError> {
    let menus = MenuService::get_menu_by_day(&state.db, day).await?;
    Ok(Json(ApiResponse::success(daily(day, menus))))
}

#[utoipa::path(
    get,
    path = "/api/menu/day/{day}/meal/{meal}",
    params(
        ("day" = DayOfWeek, Path, description = "Day of week"),
        ("meal" = MealType, Path, description = "Meal type")
    ),
    responses(
        (status = 200, description = "Menu entry", body = MenuResponse),
        (status = 404, description = "No menu for that day and meal", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn get_menu_by_day_and_meal(
    State(state): State<AppState>,
    Path((day, meal)): Path<(DayOfWeek, MealType)>,
) -> Result<Json<ApiResponse<MenuResponse>>, AppError> {
    let menu = MenuService::get_menu_by_day_and_meal(&state.db, day, meal).await?;
    Ok(Json(ApiResponse::success(menu.into())))
}

/// Create a menu entry
#[utoipa::path(
    post,
    path = "/api/menu",
    request_body = CreateMenuDto,
    responses(
        (status = 201, description = "Menu created", body = MenuResponse),
        (status = 400, description = "Validation error or day and meal already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state, dto))]
pub async fn create_menu(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateMenuDto>,
) -> Result<(StatusCode, Json<ApiResponse<MenuResponse>>), AppError> {
    let menu = MenuService::create_menu(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Menu created successfully", menu.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu entry", body = MenuResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<MenuId>,
) -> Result<Json<ApiResponse<MenuResponse>>, AppError> {
    let menu = MenuService::get_menu(&state.db, id).await?;
    Ok(Json(ApiResponse::success(menu.into())))
}

/// Update a menu entry by ID
///
/// Blank `items` leave the current items in place.
#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpdateMenuDto,
    responses(
        (status = 200, description = "Menu updated", body = MenuResponse),
        (status = 404, description = "Menu not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state, dto))]
pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<MenuId>,
    ValidatedJson(dto): ValidatedJson<UpdateMenuDto>,
) -> Result<Json<ApiResponse<MenuResponse>>, AppError> {
    let menu = MenuService::update_menu(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Menu updated successfully", menu.into())))
}

#[utoipa::path(
    put,
    path = "/api/menu/day/{day}/meal/{meal}",
    params(
        ("day" = DayOfWeek, Path, description = "Day of week"),
        ("meal" = MealType, Path, description = "Meal type")
    ),
    request_body = UpdateMenuDto,
    responses(
        (status = 200, description = "Menu updated", body = MenuResponse),
        (status = 404, description = "No menu for that day and meal", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state, dto))]
pub async fn update_menu_by_day_and_meal(
    State(state): State<AppState>,
    Path((day, meal)): Path<(DayOfWeek, MealType)>,
    ValidatedJson(dto): ValidatedJson<UpdateMenuDto>,
) -> Result<Json<ApiResponse<MenuResponse>>, AppError> {
    let menu = MenuService::update_menu_by_day_and_meal(&state.db, day, meal, dto).await?;
    Ok(Json(ApiResponse::with_message("Menu updated successfully", menu.into())))
}

#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu deleted", body = DeletedResource),
        (status = 404, description = "Menu not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Mess Menu"
)]
#[instrument(skip(state))]
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<MenuId>,
) -> Result<Json<ApiResponse<DeletedResource>>, AppError> {
    MenuService::delete_menu(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Menu deleted successfully",
        DeletedResource::new(id),
    )))
}
