use std::sync::Arc;

use crate::{
    dto::{
        CreateFolderRequest, CreateNoteRequest, FolderResponse, NoteResponse, UpdateFolderRequest,
        UpdateNoteRequest,
    },
    error::ApiError,
    repository::{FolderStore, NoteStore},
};

/// Request-handling core for `/api/notes`: validates bodies, drives the
/// store accessor, and projects rows through the serializer. Holds no state
/// between requests beyond the injected store handle.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ApiError> {
        let notes = self.store.list_notes().await?;
        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ApiError> {
        let new_note = request.validate()?;
        let note = self.store.insert_note(new_note).await?;
        Ok(NoteResponse::from(note))
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, ApiError> {
        let note = self
            .store
            .get_note_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Note"))?;
        Ok(NoteResponse::from(note))
    }

    /// Confirms the row exists before deleting, so a repeated delete reports
    /// 404 rather than succeeding silently.
    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        self.store
            .get_note_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Note"))?;
        self.store.delete_note_by_id(id).await?;
        Ok(())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<(), ApiError> {
        self.store
            .get_note_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Note"))?;
        let patch = request.validate()?;
        self.store.update_note(id, patch).await?;
        Ok(())
    }
}

/// Same shape as [`NoteService`], for `/api/folders`.
#[derive(Clone)]
pub struct FolderService {
    store: Arc<dyn FolderStore>,
}

impl FolderService {
    pub fn new(store: Arc<dyn FolderStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_folders(&self) -> Result<Vec<FolderResponse>, ApiError> {
        let folders = self.store.list_folders().await?;
        Ok(folders.into_iter().map(FolderResponse::from).collect())
    }

    pub async fn create_folder(
        &self,
        request: CreateFolderRequest,
    ) -> Result<FolderResponse, ApiError> {
        let new_folder = request.validate()?;
        let folder = self.store.insert_folder(new_folder).await?;
        Ok(FolderResponse::from(folder))
    }

    pub async fn get_one_folder(&self, id: i64) -> Result<FolderResponse, ApiError> {
        let folder = self
            .store
            .get_folder_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Folder"))?;
        Ok(FolderResponse::from(folder))
    }

    pub async fn delete_folder(&self, id: i64) -> Result<(), ApiError> {
        self.store
            .get_folder_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Folder"))?;
        self.store.delete_folder_by_id(id).await?;
        Ok(())
    }

    pub async fn update_folder(
        &self,
        id: i64,
        request: UpdateFolderRequest,
    ) -> Result<(), ApiError> {
        self.store
            .get_folder_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("Folder"))?;
        let patch = request.validate()?;
        self.store.update_folder(id, patch).await?;
        Ok(())
    }
}
