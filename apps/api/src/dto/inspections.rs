use millqc_domain::{InspectionSession, SelectedDefectObservation};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for opening an inspection.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-inspection-request.ts"
)]
pub struct CreateInspectionRequest {
    pub stage: String,
    pub order_type: String,
}

/// Incoming payload for a defect count change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-defect-count-request.ts"
)]
pub struct SetDefectCountRequest {
    #[ts(type = "number")]
    pub count: i64,
}

/// API representation of a selected defect.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/selected-defect-response.ts"
)]
pub struct SelectedDefectResponse {
    pub defect_code: String,
    pub severity: String,
    pub count: u32,
}

impl From<&SelectedDefectObservation> for SelectedDefectResponse {
    fn from(value: &SelectedDefectObservation) -> Self {
        Self {
            defect_code: value.defect_code().to_owned(),
            severity: value.severity().as_str().to_owned(),
            count: value.count(),
        }
    }
}

/// API representation of an inspection session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/inspection-response.ts"
)]
pub struct InspectionResponse {
    pub id: String,
    pub stage: String,
    pub process: String,
    pub inspector_subject: String,
    pub order_type: String,
    pub defects: Vec<SelectedDefectResponse>,
    pub highest_severity: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InspectionSession> for InspectionResponse {
    fn from(value: InspectionSession) -> Self {
        Self {
            id: value.id().to_string(),
            stage: value.stage().as_str().to_owned(),
            process: value.process().as_str().to_owned(),
            inspector_subject: value.inspector_subject().to_owned(),
            order_type: value.order_type().as_str().to_owned(),
            defects: value
                .selection()
                .observations()
                .iter()
                .map(SelectedDefectResponse::from)
                .collect(),
            highest_severity: value
                .selection()
                .highest_severity()
                .map(|severity| severity.as_str().to_owned()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}
