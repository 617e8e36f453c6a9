use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    models::{Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch},
    sanitize,
};

/// Wire shape of a note. Text fields are sanitized on every serialization;
/// the stored row keeps the submitted original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note body
    pub content: String,
    /// Last-modified time, client-supplied on create
    pub modified: DateTime<Utc>,
    /// Owning folder, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: sanitize::clean(&note.title),
            content: sanitize::clean(&note.content),
            modified: note.modified,
            folder_id: note.folder_id,
        }
    }
}

/// Wire shape of a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    /// Folder ID
    pub folder_id: i64,
    /// Folder title
    pub title: String,
    /// Caller-supplied note count, never recomputed here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            folder_id: folder.folder_id,
            title: sanitize::clean(&folder.title),
            count: folder.count,
        }
    }
}

/// Create-note body. Every field is optional at the serde layer so that a
/// missing field produces a 400 naming it instead of a deserialize rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub modified: Option<DateTime<Utc>>,
    pub folder_id: Option<i64>,
}

impl CreateNoteRequest {
    pub fn validate(self) -> Result<NewNote, ApiError> {
        let title = require_title(self.title)?;
        let content = self.content.ok_or(ApiError::MissingField("content"))?;
        let modified = self.modified.ok_or(ApiError::MissingField("modified"))?;

        Ok(NewNote {
            title,
            content,
            modified,
            folder_id: self.folder_id,
        })
    }
}

/// Patch-note body. At least one field must be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub modified: Option<DateTime<Utc>>,
    pub folder_id: Option<i64>,
}

impl UpdateNoteRequest {
    pub fn validate(self) -> Result<NotePatch, ApiError> {
        let patch = NotePatch {
            title: self.title,
            content: self.content,
            modified: self.modified,
            folder_id: self.folder_id,
        };

        if patch.is_empty() {
            return Err(ApiError::EmptyUpdate);
        }
        Ok(patch)
    }
}

/// Create-folder body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub title: Option<String>,
    pub count: Option<i64>,
}

impl CreateFolderRequest {
    pub fn validate(self) -> Result<NewFolder, ApiError> {
        let title = require_title(self.title)?;

        Ok(NewFolder {
            title,
            count: self.count,
        })
    }
}

/// Patch-folder body. Only the title is updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub title: Option<String>,
}

impl UpdateFolderRequest {
    pub fn validate(self) -> Result<FolderPatch, ApiError> {
        let patch = FolderPatch { title: self.title };

        if patch.is_empty() {
            return Err(ApiError::EmptyUpdate);
        }
        Ok(patch)
    }
}

// A blank title counts as missing: no persisted row may carry an empty title.
fn require_title(title: Option<String>) -> Result<String, ApiError> {
    title
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::MissingField("title"))
}
