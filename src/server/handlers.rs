// Route handlers: submissions, import preview and search

use super::{ApiResponse, AppState};
use crate::error::DirectoryError;
use crate::import::VendorDraft;
use crate::records::{FacultyForm, FacultyRecord, ManualVendorForm, VendorForm, VendorRecord};
use crate::search::{self, SearchFilters, SearchPage};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

type HandlerResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub source_url: String,
}

/// Search response: gated matches plus the summary shown to the caller
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub visible: Vec<VendorRecord>,
    pub total_matches: usize,
    pub hidden: usize,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl From<SearchPage> for SearchResponse {
    fn from(page: SearchPage) -> Self {
        Self {
            truncated: page.is_truncated(),
            notice: page.notice(),
            visible: page.visible,
            total_matches: page.total_matches,
            hidden: page.hidden,
        }
    }
}

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /vendor - Store a vendor submission
pub async fn submit_vendor(
    State(state): State<AppState>,
    Form(form): Form<VendorForm>,
) -> HandlerResult<impl IntoResponse> {
    let record = VendorRecord::from_form(&form, Utc::now());
    state.store.append(&record)?;

    info!(company = %record.company_name, product = %record.product_name, "vendor submitted");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// POST /vendor/manual - Store a manually entered vendor, tagged `manual`
pub async fn submit_manual_vendor(
    State(state): State<AppState>,
    Form(form): Form<ManualVendorForm>,
) -> HandlerResult<impl IntoResponse> {
    let record = VendorRecord::from_manual_form(&form, Utc::now());
    state.store.append(&record)?;

    info!(company = %record.company_name, "manual vendor submitted");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// POST /faculty/manual - Store a faculty profile (requires a .edu email)
pub async fn submit_faculty(
    State(state): State<AppState>,
    Form(form): Form<FacultyForm>,
) -> HandlerResult<impl IntoResponse> {
    let record = FacultyRecord::from_form(&form, Utc::now())?;
    state.store.append(&record)?;

    info!(name = %record.name, "faculty profile submitted");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// POST /vendor/import/preview - Fetch a page and return a pre-filled draft
pub async fn import_preview(
    State(state): State<AppState>,
    Form(request): Form<ImportRequest>,
) -> HandlerResult<Json<ApiResponse<VendorDraft>>> {
    let draft = state.fetcher.import_preview(&request.source_url).await?;
    Ok(Json(ApiResponse::ok(draft)))
}

/// GET /search - Filter vendors; anonymous callers see the first few matches
pub async fn search_vendors(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> HandlerResult<Json<ApiResponse<SearchResponse>>> {
    let page = search::search(&state.store, &filters, state.free_results)?;
    Ok(Json(ApiResponse::ok(page.into())))
}
