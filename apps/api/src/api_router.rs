use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use millqc_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/me/access", get(handlers::access::me_access_handler))
        .route("/api/me/stages", get(handlers::access::me_stages_handler))
        .route(
            "/api/departments/{department_id}/access",
            get(handlers::access::department_access_handler),
        )
        .route(
            "/api/features/{feature_id}/access",
            get(handlers::access::feature_access_handler),
        )
        .route("/api/defects", get(handlers::catalog::list_defects_handler))
        .route(
            "/api/severities/{severity}/display-class",
            get(handlers::catalog::severity_display_class_handler),
        )
        .route("/api/stages", get(handlers::catalog::list_stages_handler))
        .route(
            "/api/stages/{stage}/process",
            get(handlers::catalog::stage_process_handler),
        )
        .route(
            "/api/stages/{stage}/defects",
            get(handlers::catalog::stage_defects_handler),
        )
        .route(
            "/api/stages/{stage}/inspectors",
            get(handlers::catalog::stage_inspectors_handler),
        )
        .route(
            "/api/inspectors/{inspector_id}/stages",
            get(handlers::catalog::inspector_stages_handler),
        )
        .route(
            "/api/inspections",
            post(handlers::inspections::create_inspection_handler),
        )
        .route(
            "/api/inspections/{session_id}",
            get(handlers::inspections::get_inspection_handler),
        )
        .route(
            "/api/inspections/{session_id}/defects",
            get(handlers::inspections::list_inspection_defects_handler),
        )
        .route(
            "/api/inspections/{session_id}/defects/{defect_code}/toggle",
            post(handlers::inspections::toggle_defect_handler),
        )
        .route(
            "/api/inspections/{session_id}/defects/{defect_code}/count",
            put(handlers::inspections::set_defect_count_handler),
        )
        .route_layer(from_fn(middleware::require_identity));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
