//! Axum route handlers for the Screening API.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::screening::matcher::MatchResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// One ranked entry of a batch screening run.
#[derive(Debug, Serialize)]
pub struct ScreenedResume {
    pub filename: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// A file the batch could not score. Skips never abort the batch; they are
/// reported here instead of disappearing.
#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub request_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub results: Vec<ScreenedResume>,
    pub skipped: Vec<SkippedFile>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Scores one resume text against one job description and returns the
/// full match report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let result = state
        .screener
        .calculate_match(&request.resume_text, &request.job_description);

    Ok(Json(result))
}

/// POST /api/v1/screen
///
/// Batch screening. Multipart body: one `job_description` text field plus
/// one or more `resumes` file parts (.pdf or .txt). Each file is reduced
/// to plain text, scored against the description, and the batch comes
/// back ranked by overall score descending (ties keep upload order).
/// Files that cannot be read are skipped and reported, never fatal.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, AppError> {
    let mut job_description: Option<String> = None;
    let mut uploads: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;
                job_description = Some(text);
            }
            Some("resumes") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Validation("resume part is missing a filename".to_string())
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;
                uploads.push((filename, data));
            }
            other => {
                warn!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let job_description = job_description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;
    if uploads.is_empty() {
        return Err(AppError::Validation("no resume files uploaded".to_string()));
    }

    let request_id = Uuid::new_v4();
    let mut candidates: Vec<(String, String)> = Vec::with_capacity(uploads.len());
    let mut skipped = Vec::new();

    for (filename, data) in &uploads {
        match extract_text(filename, data) {
            Ok(text) if text.trim().is_empty() => {
                warn!(%request_id, %filename, "extracted no text; skipping file");
                skipped.push(SkippedFile {
                    filename: filename.clone(),
                    reason: "no text could be extracted".to_string(),
                });
            }
            Ok(text) => candidates.push((filename.clone(), text)),
            Err(e) => {
                warn!(%request_id, %filename, error = %e, "skipping file");
                skipped.push(SkippedFile {
                    filename: filename.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let ranked = state.screener.rank(&candidates, &job_description);
    info!(
        %request_id,
        scored = ranked.len(),
        skipped = skipped.len(),
        "screening batch complete"
    );

    Ok(Json(ScreenResponse {
        request_id,
        processed_at: Utc::now(),
        results: ranked
            .into_iter()
            .map(|r| ScreenedResume {
                filename: r.id,
                result: r.result,
            })
            .collect(),
        skipped,
    }))
}
