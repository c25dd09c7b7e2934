use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sheet_layout::SheetError;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Layout(#[from] SheetError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Layout(SheetError::NoImages) => (
                StatusCode::BAD_REQUEST,
                "NO_IMAGES",
                "No images were uploaded".to_string(),
            ),
            // The response carries only the index; file name and decode
            // detail stay in the log.
            AppError::Layout(SheetError::ImageProcessing {
                index,
                name,
                source,
            }) => {
                tracing::error!(index, name = %name, "Image processing failed: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IMAGE_PROCESSING_FAILED",
                    format!("Image {index} could not be processed"),
                )
            }
            AppError::Layout(e) => {
                tracing::error!("Sheet generation failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SHEET_GENERATION_FAILED",
                    "Failed to generate the sheet".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn error_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_no_images_maps_to_400() {
        let (status, json) = error_json(AppError::Layout(SheetError::NoImages)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "NO_IMAGES");
    }

    #[tokio::test]
    async fn test_image_processing_maps_to_500_without_leaking_detail() {
        let source = image::load_from_memory(b"not an image").unwrap_err();
        let error = AppError::Layout(SheetError::ImageProcessing {
            index: 3,
            name: "holiday.png".to_string(),
            source,
        });

        let (status, json) = error_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "IMAGE_PROCESSING_FAILED");
        // The file name stays out of the response body
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains('3'));
        assert!(!message.contains("holiday"));
    }
}
