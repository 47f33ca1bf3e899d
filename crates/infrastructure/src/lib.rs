//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_inspection_session_repository;
mod in_memory_role_assignment_repository;
mod in_memory_stage_permission_repository;
mod seed_files;

pub use in_memory_inspection_session_repository::InMemoryInspectionSessionRepository;
pub use in_memory_role_assignment_repository::InMemoryRoleAssignmentRepository;
pub use in_memory_stage_permission_repository::InMemoryStagePermissionRepository;
pub use seed_files::{RoleAssignmentSeed, load_role_assignments, load_stage_permissions};
