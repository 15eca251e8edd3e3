//! HTTP server for the catalog cleaner.
//!
//! # API Endpoints
//!
//! | Method | Path       | Description                                        |
//! |--------|------------|----------------------------------------------------|
//! | GET    | `/health`  | Health check                                       |
//! | POST   | `/process` | Upload a CSV (`file`, optional `id_column`), get a ZIP |

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::convert::Infallible;
use std::path::Path;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::archive::build_result_zip;
use super::types::HealthResponse;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::transform::pipeline::{process_csv, CleanOptions};
use crate::transform::report::report_to_json;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const DEFAULT_UPLOAD_NAME: &str = "products.csv";
const ZIP_CHUNK_SIZE: usize = 64 * 1024;

/// Build the application router.
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/process", post(process_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "catalog cleaner listening");
    tracing::info!("POST /process - upload CSV, receive processed.zip");
    tracing::info!("GET  /health  - health check");

    axum::serve(listener, router()).await?;
    Ok(())
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// A parsed `/process` request.
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    id_column: String,
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut id_column: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let name = field
                    .file_name()
                    .and_then(|n| Path::new(n).file_name())
                    .and_then(|n| n.to_str())
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_UPLOAD_NAME)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                file = Some((name, bytes.to_vec()));
            }
            "id_column" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                let value = value.trim();
                if !value.is_empty() {
                    id_column = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    Ok(Upload {
        file_name,
        bytes,
        id_column: id_column.unwrap_or_else(|| CleanOptions::default().id_column),
    })
}

/// Clean an upload inside a temporary directory and package the results.
fn clean_upload(upload: Upload) -> ServerResult<Vec<u8>> {
    let tmp = tempfile::tempdir().map_err(|e| ServerError::Internal(e.to_string()))?;
    let input = tmp.path().join(&upload.file_name);
    let output = tmp.path().join("clean.csv");
    std::fs::write(&input, &upload.bytes).map_err(|e| ServerError::Internal(e.to_string()))?;

    let options = CleanOptions::with_id_column(upload.id_column);
    let report = process_csv(&input, &output, &options)?;
    let report_json = report_to_json(&report, true).map_err(|e| ServerError::Internal(e.to_string()))?;

    let clean_csv = std::fs::read(&output).map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(build_result_zip(&clean_csv, &report_json)?)
}

/// Upload CSV endpoint
async fn process_upload(multipart: Multipart) -> ServerResult<Response> {
    let upload = read_upload(multipart).await?;
    let job_id = Uuid::new_v4();
    tracing::info!(
        %job_id,
        file = %upload.file_name,
        bytes = upload.bytes.len(),
        id_column = %upload.id_column,
        "new upload"
    );

    let zip = tokio::task::spawn_blocking(move || clean_upload(upload))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    tracing::info!(%job_id, bytes = zip.len(), "sending processed.zip");

    let chunks: Vec<Result<Bytes, Infallible>> = zip
        .chunks(ZIP_CHUNK_SIZE)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    let body = Body::from_stream(tokio_stream::iter(chunks));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"processed.zip\"",
        )
        .body(body)
        .map_err(|e| ServerError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::io::{Cursor, Read};
    use tower::ServiceExt;
    use zip::ZipArchive;

    const BOUNDARY: &str = "cleanerboundary";

    fn multipart_body(file: Option<(&str, &str)>, id_column: Option<&str>) -> String {
        let mut body = String::new();
        if let Some((name, content)) = file {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            ));
        }
        if let Some(id) = id_column {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"id_column\"\r\n\r\n{id}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn process_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
        content
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_process_returns_zip() {
        let csv = "id,Name,Proce\n1, Lamp ,10\n1,Lamp copy,11\n2,Desk,99\n";
        let response = router()
            .oneshot(process_request(multipart_body(Some(("shop.csv", csv)), None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"processed.zip\""
        );

        let mut archive = ZipArchive::new(Cursor::new(body_bytes(response).await)).unwrap();
        let clean = read_entry(&mut archive, "clean.csv");
        let report: Value = serde_json::from_str(&read_entry(&mut archive, "report.json")).unwrap();

        assert!(clean.starts_with("id,name,price,description,"));
        assert_eq!(clean.lines().count(), 3);
        assert_eq!(report["id_column_used"], "id");
        assert_eq!(report["cleaned_rows"], 2);
        assert_eq!(report["duplicates_removed"], 1);
        assert!(report["input_file"].as_str().unwrap().ends_with("shop.csv"));
    }

    #[tokio::test]
    async fn test_process_respects_id_column() {
        let csv = "sku,name\nA,Lamp\nA,Lamp\nB,Desk\n";
        let response = router()
            .oneshot(process_request(multipart_body(Some(("p.csv", csv)), Some("zzz"))))
            .await
            .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(body_bytes(response).await)).unwrap();
        let report: Value = serde_json::from_str(&read_entry(&mut archive, "report.json")).unwrap();

        assert_eq!(report["id_column_used"], Value::Null);
        assert_eq!(report["cleaned_rows"], 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_bad_request() {
        let response = router()
            .oneshot(process_request(multipart_body(None, Some("id"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_malformed_csv_is_unprocessable() {
        let response = router()
            .oneshot(process_request(multipart_body(Some(("bad.csv", "a,b\n1,2,3\n")), None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("expected 2 fields"));
    }
}
