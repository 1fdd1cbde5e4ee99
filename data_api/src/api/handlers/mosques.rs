use crate::api::api_models::MosqueResponse;
use crate::api::db::MosqueDirectory;
use crate::api::error::ApiError;
use crate::api::extractors::params::MosqueQuery;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use shared::mosques::NewMosqueRequest;
use std::sync::Arc;
use tracing::info;

pub async fn list_mosques(
    State(mosques): State<Arc<dyn MosqueDirectory>>,
    MosqueQuery(filter): MosqueQuery,
) -> Result<Json<Vec<MosqueResponse>>, ApiError> {
    let mosques = mosques.list_mosques(&filter).await?;
    Ok(Json(mosques.into_iter().map(Into::into).collect()))
}

pub async fn get_mosque(
    State(mosques): State<Arc<dyn MosqueDirectory>>,
    Path(mosque_id): Path<String>,
) -> Result<Json<MosqueResponse>, ApiError> {
    let mosque = mosques
        .find_mosque(&mosque_id)
        .await?
        .ok_or(ApiError::MosqueNotFound(mosque_id))?;
    Ok(Json(mosque.into()))
}

pub async fn create_mosque(
    State(mosques): State<Arc<dyn MosqueDirectory>>,
    payload: Result<Json<NewMosqueRequest>, JsonRejection>,
) -> Result<Json<MosqueResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let mosque = mosques.insert_mosque(request.into_mosque()?).await?;
    info!(name: "mosques.created", id = %mosque.id, "created mosque");
    Ok(Json(mosque.into()))
}
