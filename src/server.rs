// 🌐 HTTP Form - REST API + single-page form with Axum
//
// One process, one session: the router owns a single Session behind a mutex.
// Reports are rendered from a cloned record after the lock is released.

use crate::grading::Marks;
use crate::record::StudentRecord;
use crate::report::{self, ReportFile};
use crate::session::{self, Session};
use crate::store::{self, SearchQuery, SelectionOption};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // Session data stays consistent even if a handler panicked mid-request
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

/// POST /api/students body
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_number: String,
    pub marks: HashMap<String, i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub record: StudentRecord,
    pub message: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/students?name=&roll= - Table rows, optionally searched (`roll_number=` also accepted)
async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let session = state.session();
    let rows: Vec<StudentRecord> = session.table(&query).into_iter().cloned().collect();
    Json(ApiResponse::ok(rows))
}

/// POST /api/students - Submit the entry form
async fn submit_student(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let marks = match Marks::try_from(request.marks) {
        Ok(marks) => marks,
        Err(e) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };

    let record = StudentRecord::new(request.name.trim(), request.roll_number.trim(), marks);
    let stored = state.session().submit(record).clone();

    let response = SubmitResponse {
        message: session::success_message(&stored),
        record: stored,
    };
    (StatusCode::CREATED, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/students/options - Selection list for downloads
async fn selection_options(State(state): State<AppState>) -> impl IntoResponse {
    let options: Vec<SelectionOption> = state.session().selection_options();
    Json(ApiResponse::ok(options))
}

/// GET /api/students/export.csv - Whole table as CSV
async fn export_csv(State(state): State<AppState>) -> Response {
    let mut out = Vec::new();
    let result = {
        let session = state.session();
        store::write_records_csv(session.store().list_all(), &mut out)
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"students.csv\"".to_string(),
                ),
            ],
            out,
        )
            .into_response(),
        Err(e) => {
            error!("Error exporting CSV: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/students/:id/report - PDF for the selected record
async fn report_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let record = state.session().store().find_by_id(&id).cloned();
    match record {
        Some(record) => pdf_response(&record),
        None => error_response(StatusCode::NOT_FOUND, format!("no student with id {}", id)),
    }
}

/// GET /api/reports/by-name/:name - PDF for the first record with this name
async fn report_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let record = state.session().store().find_by_name(&name).cloned();
    match record {
        Some(record) => pdf_response(&record),
        None => error_response(StatusCode::NOT_FOUND, format!("no student named {}", name)),
    }
}

fn pdf_response(record: &StudentRecord) -> Response {
    let rendered = report::write_temp_report(record).and_then(|file| {
        let bytes = file.read_bytes()?;
        Ok((file, bytes))
    });

    match rendered {
        Ok((file, bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, file.content_type.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&file)),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Error rendering report for {}: {}", record.name, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// ASCII fallback plus RFC 5987 UTF-8 filename
fn content_disposition(file: &ReportFile) -> String {
    let ascii: String = file
        .file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(&file.file_name)
    )
}

/// GET / - Serve the form page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/students", get(list_students).post(submit_student))
        .route("/students/options", get(selection_options))
        .route("/students/export.csv", get(export_csv))
        .route("/students/:id/report", get(report_by_id))
        .route("/reports/by-name/:name", get(report_by_name))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
