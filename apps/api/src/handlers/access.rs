use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use millqc_core::UserIdentity;
use millqc_domain::{DepartmentId, FeatureId};

use crate::dto::{AccessCheckResponse, AccessSummaryResponse, StageVisibilityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn me_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AccessSummaryResponse>> {
    let summary = state.access_service.access_summary(&user).await?;
    Ok(Json(AccessSummaryResponse::new(&user, &summary)))
}

pub async fn me_stages_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<StageVisibilityResponse>> {
    let visibility = state
        .qc_assignment_service
        .filter_stages_for_user(user.email().unwrap_or_default())
        .await?;

    Ok(Json(StageVisibilityResponse::from(visibility)))
}

/// Unknown department ids are reported as not allowed.
pub async fn department_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(department_id): Path<String>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let allowed = match DepartmentId::from_str(department_id.as_str()) {
        Ok(department) => {
            state
                .access_service
                .can_access_department(&user, department)
                .await?
        }
        Err(_) => false,
    };

    Ok(Json(AccessCheckResponse {
        target: department_id,
        allowed,
    }))
}

/// Unknown feature ids are reported as not allowed.
pub async fn feature_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(feature_id): Path<String>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let allowed = match FeatureId::from_str(feature_id.as_str()) {
        Ok(feature) => state.access_service.can_access_feature(&user, feature).await?,
        Err(_) => false,
    };

    Ok(Json(AccessCheckResponse {
        target: feature_id,
        allowed,
    }))
}
