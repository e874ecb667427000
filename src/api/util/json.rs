use axum::Json;

use crate::api::dto::ApiResponse;
use crate::core::client::executor::QueryError;
use crate::errors::AppError;

/// Map a domain result into the API envelope, preserving the original
/// error string for the error response.
pub fn to_json<T: serde::Serialize>(
    result: Result<T, QueryError>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => Err(err.into()),
    }
}
