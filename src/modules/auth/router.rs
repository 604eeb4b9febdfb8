use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{
    google_callback, google_login, login, refresh_token, register_admin, register_student,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register_student))
        .route("/register/admin", post(register_admin))
        .route("/refresh", post(refresh_token))
        .route("/oauth2/google", get(google_login))
        .route("/oauth2/callback/google", get(google_callback))
}
