use chrono::{DateTime, Utc};

/// A row of the `notes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub modified: DateTime<Utc>,
    pub folder_id: Option<i64>,
}

/// A row of the `folders` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub folder_id: i64,
    pub title: String,
    pub count: Option<i64>,
}

/// Fields for inserting a note. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub modified: DateTime<Utc>,
    pub folder_id: Option<i64>,
}

/// Fields for inserting a folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub title: String,
    pub count: Option<i64>,
}

/// Partial update for a note. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub modified: Option<DateTime<Utc>>,
    pub folder_id: Option<i64>,
}

impl NotePatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.modified.is_none()
            && self.folder_id.is_none()
    }
}

/// Partial update for a folder.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    pub title: Option<String>,
}

impl FolderPatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}
