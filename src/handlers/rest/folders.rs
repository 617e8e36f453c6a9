use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_macros::debug_handler;

use crate::{
    dto::{CreateFolderRequest, FolderResponse, UpdateFolderRequest},
    error::ApiError,
};

use super::AppState;

#[utoipa::path(
    get,
    path = "/api/folders",
    responses(
        (status = 200, description = "List of all folders", body = Vec<FolderResponse>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn get_all_folders(
    State(state): State<AppState>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = state.folders.get_all_folders().await?;
    Ok(Json(folders))
}

#[utoipa::path(
    post,
    path = "/api/folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created successfully", body = FolderResponse),
        (status = 400, description = "Required field missing"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn create_folder(
    State(state): State<AppState>,
    Json(payload): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let folder = state.folders.create_folder(payload).await?;
    let location = format!("/api/folders/{}", folder.folder_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(folder),
    ))
}

#[utoipa::path(
    get,
    path = "/api/folders/{id}",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder found", body = FolderResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Folder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn get_one_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FolderResponse>, ApiError> {
    let folder = state.folders.get_one_folder(id).await?;
    Ok(Json(folder))
}

#[utoipa::path(
    delete,
    path = "/api/folders/{id}",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 204, description = "Folder deleted successfully"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Folder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.folders.delete_folder(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/folders/{id}",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    request_body = UpdateFolderRequest,
    responses(
        (status = 204, description = "Folder updated successfully"),
        (status = 400, description = "No updatable field supplied"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Folder not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFolderRequest>,
) -> Result<StatusCode, ApiError> {
    state.folders.update_folder(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
