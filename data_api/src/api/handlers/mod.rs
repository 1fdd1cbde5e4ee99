use crate::api::api_models::ApiInfoResponse;
use axum::Json;

pub mod mosques;
pub mod prayer_times;

pub async fn api_info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "Salah Reminder API".to_string(),
    })
}
