//! HTTP处理器

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::info;
use ward_core::{DeleteOutcome, Page, Patient, PatientFilter};

use crate::dto::{CreatePatientRequest, UpdatePatientRequest};
use crate::error::ApiError;
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 患者列表：游标分页，可按状态过滤
pub async fn list_patients(
    State(state): State<AppState>,
    query: Result<Query<PatientFilter>, QueryRejection>,
) -> ApiResult<Json<Page<Patient>>> {
    let Query(filter) = query?;
    info!("Listing patients with filter: {:?}", filter);

    let page = state.patients.get_all_patients(&filter).await?;
    Ok(Json(page))
}

/// 按ID获取患者
pub async fn get_patient(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Patient>> {
    let Path(id) = id?;
    let patient = state.patients.get_patient_by_id(id).await?;
    Ok(Json(patient))
}

/// 创建患者
pub async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let Json(request) = body?;
    let new_patient = request.validate()?;

    let patient = state.patients.create_patient(new_patient).await?;
    info!("Created patient {}", patient.id);
    Ok((StatusCode::CREATED, Json(patient)))
}

/// 部分更新患者，空请求体视为不修改任何字段
pub async fn update_patient(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Patient>> {
    let Path(id) = id?;
    let request = UpdatePatientRequest::from_body(&body?)?;
    let update = request.validate()?;

    let patient = state.patients.update_patient(id, update).await?;
    info!("Updated patient {}", id);
    Ok(Json(patient))
}

/// 删除患者
pub async fn delete_patient(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteOutcome>> {
    let Path(id) = id?;
    let outcome = state.patients.delete_patient(id).await?;
    info!("Deleted patient {}", id);
    Ok(Json(outcome))
}
