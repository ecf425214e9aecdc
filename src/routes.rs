// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{applications, auth, departments, jobs, offers, reports, users},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public: signup verification, login, open job postings, departments.
/// * Authenticated: application submission and the caller's own data.
/// * Admin: postings, the application lifecycle, offer letters, reports.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/otp", post(auth::request_code))
        .route("/otp/verify", post(auth::verify_code))
        .route("/login", post(auth::login));

    let public_routes = Router::new()
        .route("/api/jobs", get(jobs::list_active))
        .route("/api/jobs/{id}", get(jobs::get_job))
        .route("/api/departments", get(departments::list_departments));

    let user_routes = Router::new()
        .route("/api/applications", post(applications::submit_application))
        .route(
            "/api/applications/mine",
            get(applications::list_my_applications),
        )
        .route("/api/users/me", get(users::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/jobs", get(jobs::list_all).post(jobs::create_job))
        .route("/jobs/expired", get(jobs::list_expired))
        .route("/jobs/{id}", put(jobs::update_job).delete(jobs::delete_job))
        .route("/departments", post(departments::create_department))
        .route(
            "/departments/{id}",
            delete(departments::delete_department),
        )
        .route("/applications", get(applications::list_applications))
        .route("/applications/{id}", get(applications::get_application))
        .route("/applications/{id}/shortlist", post(applications::shortlist))
        .route("/applications/{id}/hold", post(applications::hold))
        .route("/applications/{id}/reject", post(applications::reject))
        .route("/applications/{id}/evaluate", post(applications::evaluate))
        .route(
            "/applications/{id}/notify",
            post(applications::resend_notification),
        )
        .route("/offers", get(offers::list_offers))
        .route(
            "/offers/{application_id}",
            get(offers::get_offer).put(offers::save_offer),
        )
        .route("/offers/{application_id}/send", post(offers::send_offer))
        .route("/reports/summary", get(reports::summary))
        .route("/users", get(users::list_users))
        // Auth runs first, then the admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .merge(public_routes)
        .merge(user_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
