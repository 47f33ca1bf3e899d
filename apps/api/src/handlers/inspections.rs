use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use millqc_application::StartInspectionInput;
use millqc_core::UserIdentity;
use millqc_domain::{InspectionStage, OrderType};
use uuid::Uuid;

use crate::dto::{
    CreateInspectionRequest, DefectResponse, InspectionResponse, SetDefectCountRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_inspection_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateInspectionRequest>,
) -> ApiResult<(StatusCode, Json<InspectionResponse>)> {
    let input = StartInspectionInput {
        stage: InspectionStage::from_str(payload.stage.as_str())?,
        order_type: OrderType::from_str(payload.order_type.as_str())?,
    };

    let session = state.inspection_service.start_session(&user, input).await?;
    Ok((StatusCode::CREATED, Json(InspectionResponse::from(session))))
}

pub async fn get_inspection_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<InspectionResponse>> {
    let session = state
        .inspection_service
        .get_session(&user, session_id)
        .await?;
    Ok(Json(InspectionResponse::from(session)))
}

pub async fn list_inspection_defects_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Vec<DefectResponse>>> {
    let defects = state
        .inspection_service
        .defects_for_session(&user, session_id)
        .await?;
    Ok(Json(defects.iter().map(DefectResponse::from).collect()))
}

pub async fn toggle_defect_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((session_id, defect_code)): Path<(Uuid, String)>,
) -> ApiResult<Json<InspectionResponse>> {
    let session = state
        .inspection_service
        .toggle_defect(&user, session_id, defect_code.as_str())
        .await?;
    Ok(Json(InspectionResponse::from(session)))
}

pub async fn set_defect_count_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((session_id, defect_code)): Path<(Uuid, String)>,
    Json(payload): Json<SetDefectCountRequest>,
) -> ApiResult<Json<InspectionResponse>> {
    let session = state
        .inspection_service
        .set_defect_count(&user, session_id, defect_code.as_str(), payload.count)
        .await?;
    Ok(Json(InspectionResponse::from(session)))
}
