use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::{AllowHeaders, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::enforce_access_policy;
use crate::modules::auth::router::init_auth_router;
use crate::modules::blocks::router::init_blocks_router;
use crate::modules::complaints::router::init_complaints_router;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::menu::router::init_menu_router;
use crate::modules::rooms::router::init_rooms_router;
use crate::modules::students::router::init_students_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use dormex_config::CorsConfig;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();

    // A literal `*` cannot be combined with credentials, so mirror instead.
    let headers = if config.allows_any_header() {
        AllowHeaders::mirror_request()
    } else {
        let names: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|header| header.parse().ok())
            .collect();
        AllowHeaders::list(names)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", init_auth_router())
        .nest("/users", init_users_router())
        .nest("/students", init_students_router())
        .nest("/blocks", init_blocks_router())
        .nest("/rooms", init_rooms_router())
        .nest("/complaints", init_complaints_router())
        .nest("/menu", init_menu_router())
        .nest("/dashboard", init_dashboard_router());

    Router::new()
        .nest("/api", api)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_access_policy,
        ))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}
