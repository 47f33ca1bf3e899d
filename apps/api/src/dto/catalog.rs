use millqc_domain::{DefectDefinition, InspectionStage, Inspector};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string for defect lookups.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/defect-query.ts"
)]
pub struct DefectQuery {
    pub process: Option<String>,
}

/// API representation of a defect definition.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/defect-response.ts"
)]
pub struct DefectResponse {
    pub code: String,
    pub name: String,
    pub process: String,
    pub severity: String,
    pub display_class: String,
    pub display_token: String,
}

impl From<&DefectDefinition> for DefectResponse {
    fn from(value: &DefectDefinition) -> Self {
        Self {
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            process: value.process().as_str().to_owned(),
            severity: value.severity().as_str().to_owned(),
            display_class: value.severity().display_class().as_str().to_owned(),
            display_token: value.severity().display_class().token().to_owned(),
        }
    }
}

/// Styling bucket for a severity label.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/severity-display-class-response.ts"
)]
pub struct SeverityDisplayClassResponse {
    pub severity: String,
    pub display_class: String,
    pub token: String,
}

/// Inspection stage with its defect-table process.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/stage-response.ts"
)]
pub struct StageResponse {
    pub stage: String,
    pub process: String,
}

impl From<InspectionStage> for StageResponse {
    fn from(value: InspectionStage) -> Self {
        Self {
            stage: value.as_str().to_owned(),
            process: value.process().as_str().to_owned(),
        }
    }
}

/// API representation of an inspector.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/inspector-response.ts"
)]
pub struct InspectorResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub assigned_stages: Vec<String>,
    pub order_types: Vec<String>,
}

impl From<&Inspector> for InspectorResponse {
    fn from(value: &Inspector) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().to_owned(),
            email: value.email().map(str::to_owned),
            assigned_stages: value
                .assigned_stages()
                .iter()
                .map(|stage| stage.as_str().to_owned())
                .collect(),
            order_types: value
                .order_types()
                .iter()
                .map(|order_type| order_type.as_str().to_owned())
                .collect(),
        }
    }
}
