use std::sync::Arc;

use millqc_application::{AccessService, InspectionService, QcAssignmentService};
use millqc_domain::DefectCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub qc_assignment_service: QcAssignmentService,
    pub inspection_service: InspectionService,
    pub defect_catalog: Arc<DefectCatalog>,
}
