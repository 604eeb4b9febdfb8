use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::menu::controller::{
    create_menu, delete_menu, get_menu, get_menu_by_day, get_menu_by_day_and_meal,
    get_today_menu, get_weekly_menu, update_menu, update_menu_by_day_and_meal,
};
use crate::state::AppState;

pub fn init_menu_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_menu))
        .route("/today", get(get_today_menu))
        .route("/weekly", get(get_weekly_menu))
        .route("/day/{day}", get(get_menu_by_day))
        .route(
            "/day/{day}/meal/{meal}",
            get(get_menu_by_day_and_meal).put(update_menu_by_day_and_meal),
        )
        .route(
            "/{id}",
            get(get_menu).put(update_menu).delete(delete_menu),
        )
}
