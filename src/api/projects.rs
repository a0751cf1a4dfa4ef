/// Project REST API endpoints
///
/// Public listing plus admin create/update/delete. Handlers only decode
/// requests and shape responses; ordering and cleanup live in the service.

use crate::{
    api::form::{parse_id, ProjectForm},
    error::{ApiError, OrRespond},
    project::{ProjectCard, ProjectService, ProjectSummary},
};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

const LIST_FAILED: &str = "Failed to retrieve project data.";
const CREATE_FAILED: &str = "Failed to create project.";
const UPDATE_FAILED: &str = "Failed to update project.";
const DELETE_FAILED: &str = "Failed to delete project.";

/// Application state shared by the project routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProjectService>,
}

/// Response for create/update operations
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub message: &'static str,
    pub project: ProjectSummary,
}

/// Create project routes
///
/// Admin routes accept multipart bodies up to `max_upload_bytes`.
pub fn create_project_routes(max_upload_bytes: usize) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/admin/projects", post(create_project))
        .route("/api/admin/projects/{id}", put(update_project).delete(delete_project))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/api/projects", get(list_projects))
        .merge(admin)
}

/// List all projects, newest first
///
/// GET /api/projects
/// Returns: [{ "id": 1, "title": "...", "description": "...", "image_url": "..." }]
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectCard>>, ApiError> {
    let projects = state.service.list().await.or_respond(LIST_FAILED)?;
    Ok(Json(projects.into_iter().map(ProjectCard::from).collect()))
}

/// Create a project
///
/// POST /api/admin/projects
/// Multipart: title, description, image
async fn create_project(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let input = ProjectForm::read(multipart)
        .await
        .and_then(ProjectForm::into_new_project)
        .or_respond(CREATE_FAILED)?;

    let project = state.service.create(input).await.or_respond(CREATE_FAILED)?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: "Project created successfully",
            project: project.into(),
        }),
    ))
}

/// Update a project
///
/// PUT /api/admin/projects/{id}
/// Multipart: title, description, optional image, existing_image_url
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let id = parse_id(&id).or_respond(UPDATE_FAILED)?;
    let input = ProjectForm::read(multipart)
        .await
        .and_then(ProjectForm::into_update)
        .or_respond(UPDATE_FAILED)?;

    let project = state.service.update(id, input).await.or_respond(UPDATE_FAILED)?;

    Ok(Json(ProjectResponse {
        message: "Project updated successfully",
        project: project.into(),
    }))
}

/// Delete a project and its image
///
/// DELETE /api/admin/projects/{id}
/// Returns: { "message": "Project deleted successfully" }
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id).or_respond(DELETE_FAILED)?;
    state.service.delete(id).await.or_respond(DELETE_FAILED)?;

    Ok(Json(json!({ "message": "Project deleted successfully" })))
}
