use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application: public routes, token-gated API, static frontend fallback
pub fn app(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.config.api.frontend_dir).append_index_html_on_directories(true);
    let cors = cors_layer(&state.config.security);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/users/", post(auth::register_post))
        .route("/api/token", post(auth::token_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{alerts, consents, consumption, properties, users};

    Router::new()
        // Account
        .route("/api/users/me", get(users::me_get).delete(users::me_delete))
        .route("/api/users/me/", get(users::me_get).delete(users::me_delete))
        // Properties
        .route("/api/properties/", get(properties::list).post(properties::create))
        .route(
            "/api/properties/:id",
            get(properties::get).put(properties::put).delete(properties::delete),
        )
        // Consumption readings
        .route(
            "/api/properties/:id/consumption",
            get(consumption::list).post(consumption::create),
        )
        .route("/api/properties/:id/consumption/import", post(consumption::import))
        .route("/api/properties/:id/consumption/export", get(consumption::export))
        // Alerts
        .route("/api/properties/:id/alerts", get(alerts::list))
        .route("/api/properties/:id/alerts/", get(alerts::list))
        .route("/api/alerts/", post(alerts::create))
        .route("/api/alerts/:id", get(alerts::get))
        // Consents
        .route("/api/properties/:id/consents", get(consents::list))
        .route("/api/properties/:id/consents/", get(consents::list))
        .route("/api/consents/", post(consents::create))
        .route("/api/consents/:id", get(consents::get))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
