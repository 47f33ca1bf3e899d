//! Mill QC API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use millqc_application::{AccessService, InspectionService, QcAssignmentService};
use millqc_core::AppError;
use millqc_domain::{DefectCatalog, PermissionCatalog, QcAssignmentTable};
use millqc_infrastructure::{
    InMemoryInspectionSessionRepository, InMemoryRoleAssignmentRepository,
    InMemoryStagePermissionRepository, load_role_assignments, load_stage_permissions,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let permission_catalog = Arc::new(PermissionCatalog::standard()?);
    let defect_catalog = Arc::new(DefectCatalog::standard()?);
    let assignment_table = Arc::new(QcAssignmentTable::standard()?);

    let unmapped_features = permission_catalog.unmapped_features();
    if !unmapped_features.is_empty() {
        warn!(
            count = unmapped_features.len(),
            "features without a required permission are denied to everyone"
        );
    }

    let role_assignments = match config.role_assignments_path.as_deref() {
        Some(path) => {
            InMemoryRoleAssignmentRepository::with_assignments(load_role_assignments(path).await?)
        }
        None => InMemoryRoleAssignmentRepository::new(),
    };

    let stage_permissions = match config.stage_permissions_path.as_deref() {
        Some(path) => {
            InMemoryStagePermissionRepository::with_records(load_stage_permissions(path).await?)
        }
        None => InMemoryStagePermissionRepository::new(),
    };

    let access_service = AccessService::new(permission_catalog, Arc::new(role_assignments));
    let qc_assignment_service = QcAssignmentService::new(
        assignment_table,
        Arc::new(stage_permissions),
        config.unprovisioned_stage_policy,
    );
    let inspection_service = InspectionService::new(
        defect_catalog.clone(),
        Arc::new(InMemoryInspectionSessionRepository::new()),
        access_service.clone(),
        qc_assignment_service.clone(),
    );

    let app_state = AppState {
        access_service,
        qc_assignment_service,
        inspection_service,
        defect_catalog,
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(
        %address,
        unprovisioned_stages = config.unprovisioned_stage_policy.as_str(),
        "millqc-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}
