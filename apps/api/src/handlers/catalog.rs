use axum::Json;
use axum::extract::{Path, Query, State};
use millqc_domain::{
    ALL_INSPECTION_STAGES, InspectionStage, map_inspection_stage_to_process,
    severity_display_class,
};

use crate::dto::{
    DefectQuery, DefectResponse, InspectorResponse, SeverityDisplayClassResponse, StageResponse,
};
use crate::state::AppState;

pub async fn list_defects_handler(
    State(state): State<AppState>,
    Query(query): Query<DefectQuery>,
) -> Json<Vec<DefectResponse>> {
    let defects = match query.process {
        Some(process) => state
            .defect_catalog
            .defects_for_process_label(process.as_str())
            .into_iter()
            .map(DefectResponse::from)
            .collect(),
        None => state
            .defect_catalog
            .definitions()
            .iter()
            .map(DefectResponse::from)
            .collect(),
    };

    Json(defects)
}

pub async fn severity_display_class_handler(
    Path(severity): Path<String>,
) -> Json<SeverityDisplayClassResponse> {
    let display_class = severity_display_class(severity.as_str());
    Json(SeverityDisplayClassResponse {
        severity,
        display_class: display_class.as_str().to_owned(),
        token: display_class.token().to_owned(),
    })
}

pub async fn list_stages_handler() -> Json<Vec<StageResponse>> {
    Json(
        ALL_INSPECTION_STAGES
            .iter()
            .copied()
            .map(StageResponse::from)
            .collect(),
    )
}

/// Unknown stage labels come back unchanged as their own process.
pub async fn stage_process_handler(Path(stage): Path<String>) -> Json<StageResponse> {
    let process = map_inspection_stage_to_process(stage.as_str());
    Json(StageResponse { stage, process })
}

pub async fn stage_defects_handler(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Json<Vec<DefectResponse>> {
    let process = map_inspection_stage_to_process(stage.as_str());
    Json(
        state
            .defect_catalog
            .defects_for_process_label(process.as_str())
            .into_iter()
            .map(DefectResponse::from)
            .collect(),
    )
}

pub async fn stage_inspectors_handler(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Json<Vec<InspectorResponse>> {
    let inspectors = InspectionStage::parse(stage.as_str())
        .map(|stage| state.qc_assignment_service.inspectors_for_stage(stage))
        .unwrap_or_default();

    Json(inspectors.iter().map(InspectorResponse::from).collect())
}

pub async fn inspector_stages_handler(
    State(state): State<AppState>,
    Path(inspector_id): Path<String>,
) -> Json<Vec<String>> {
    Json(
        state
            .qc_assignment_service
            .stages_for_inspector(inspector_id.as_str())
            .into_iter()
            .map(|stage| stage.as_str().to_owned())
            .collect(),
    )
}
