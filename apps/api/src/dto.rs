use serde::Serialize;
use ts_rs::TS;

mod access;
mod catalog;
mod inspections;

pub use access::{
    AccessCheckResponse, AccessSummaryResponse, RoleResponse, StageVisibilityResponse,
};
pub use catalog::{
    DefectQuery, DefectResponse, InspectorResponse, SeverityDisplayClassResponse, StageResponse,
};
pub use inspections::{
    CreateInspectionRequest, InspectionResponse, SelectedDefectResponse, SetDefectCountRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::{
        AccessCheckResponse, AccessSummaryResponse, CreateInspectionRequest, DefectQuery,
        DefectResponse, HealthResponse, InspectionResponse, InspectorResponse, RoleResponse,
        SelectedDefectResponse, SetDefectCountRequest, SeverityDisplayClassResponse,
        StageResponse, StageVisibilityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        RoleResponse::export(&config)?;
        AccessSummaryResponse::export(&config)?;
        AccessCheckResponse::export(&config)?;
        StageVisibilityResponse::export(&config)?;
        DefectQuery::export(&config)?;
        DefectResponse::export(&config)?;
        SeverityDisplayClassResponse::export(&config)?;
        StageResponse::export(&config)?;
        InspectorResponse::export(&config)?;
        CreateInspectionRequest::export(&config)?;
        SetDefectCountRequest::export(&config)?;
        SelectedDefectResponse::export(&config)?;
        InspectionResponse::export(&config)?;

        Ok(())
    }
}
