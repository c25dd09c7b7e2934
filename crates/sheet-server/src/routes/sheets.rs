use std::convert::Infallible;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde::Deserialize;
use sheet_layout::{ImageAsset, ProgressEvent, ProgressSender, generate_sheet_pdf};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSheetQuery {
    /// Optional job id; when present, progress is published for SSE observers.
    pub job: Option<Uuid>,
}

/// Accept a multipart batch of images and respond with the assembled PDF.
pub async fn create_sheet(
    State(state): State<AppState>,
    Query(query): Query<CreateSheetQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let per_file_limit = state.config.max_file_bytes;
    let mut images: Vec<ImageAsset> = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }

        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload-{}", images.len()));

        // Accumulate chunk by chunk so an oversized part is rejected as soon
        // as it crosses the limit, not after it has been buffered whole.
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload '{name}': {e}")))?
        {
            if bytes.len() + chunk.len() > per_file_limit {
                return Err(AppError::BadRequest(format!(
                    "File '{name}' exceeds the per-file limit of {per_file_limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        images.push(ImageAsset::new(name, bytes));

        if images.len() > state.config.max_files {
            return Err(AppError::BadRequest(format!(
                "Too many files: the limit is {}",
                state.config.max_files
            )));
        }
    }

    tracing::info!(count = images.len(), job = ?query.job, "Sheet upload received");

    // Bridge the engine's per-request progress channel onto the job's
    // broadcast channel so SSE observers can follow along.
    let progress = query.job.map(|job| {
        let (sender, rx) = ProgressSender::channel();
        let broadcast_tx = state.jobs.channel(job);
        tokio::spawn(forward_progress(rx, broadcast_tx));
        sender
    });

    let result = generate_sheet_pdf(images, &state.config.options, progress.as_ref()).await;

    if let Some(job) = &query.job {
        state.jobs.remove(job);
    }

    let pdf = result?;

    tracing::info!(bytes = pdf.len(), "Sheet PDF generated");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sheet.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}

async fn forward_progress(
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
    tx: broadcast::Sender<ProgressEvent>,
) {
    while let Some(event) = rx.recv().await {
        // No subscribers is fine; the upload proceeds regardless.
        let _ = tx.send(event);
    }
}

/// Server-sent events stream of progress for one job.
pub async fn progress_stream(
    State(state): State<AppState>,
    Path(job): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.jobs.subscribe(job);

    let stream = subscription.filter_map(|item| match item {
        Ok(event) => {
            let sse_event = Event::default()
                .event("progress")
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().event("progress").data(event.label));
            Some(Ok(sse_event))
        }
        // A lagged subscriber just skips the missed events.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use sheet_layout::SheetOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::jobs::Jobs;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "sheet-test-boundary";

    fn test_state(max_files: usize, max_file_bytes: usize) -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                max_files,
                max_file_bytes,
                options: SheetOptions::default(),
            },
            jobs: Jobs::new(),
        }
    }

    fn multipart_body(parts: &[&[u8]]) -> Vec<u8> {
        let mut body = Vec::new();
        for (i, payload) in parts.iter().enumerate() {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; \
                     filename=\"img-{i}.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(payload);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn png_bytes() -> Vec<u8> {
        use std::io::Cursor;
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([10, 150, 80]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    async fn post_sheets(state: AppState, body: Vec<u8>) -> axum::response::Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sheets")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_at_the_limit() {
        // Per-file limit well below the whole-body limit: the handler's own
        // running size check has to fire, not the outer body cap.
        let state = test_state(10, 1024);
        let response = post_sheets(state, multipart_body(&[&vec![0u8; 2048]])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_too_many_files_rejected() {
        let state = test_state(1, 1024);
        let response = post_sheets(state, multipart_body(&[b"a", b"b"])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let state = test_state(10, 1024);
        let response = post_sheets(state, multipart_body(&[])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "NO_IMAGES");
    }

    #[tokio::test]
    async fn test_upload_returns_pdf_attachment() {
        let state = test_state(10, 1024 * 1024);
        let png = png_bytes();
        let response = post_sheets(state, multipart_body(&[&png, &png])).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }
}
