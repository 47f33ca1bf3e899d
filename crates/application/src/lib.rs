//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod inspection_service;
mod ports;
mod qc_assignment_service;

pub use access_service::{AccessService, AccessSummary, ResolvedRole, RoleSource};
pub use inspection_service::{InspectionService, StartInspectionInput};
pub use ports::{InspectionSessionRepository, RoleAssignmentRepository, StagePermissionRepository};
pub use qc_assignment_service::{QcAssignmentService, StageVisibility, StageVisibilitySource};
