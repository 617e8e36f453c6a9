mod embedded;

use embedded::migrations;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row, types::ToSql};

use crate::models::{Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch};

/// Store accessor for the `notes` table. Every operation is a single
/// statement; failures propagate to the caller untouched.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, tokio_postgres::Error>;
    async fn insert_note(&self, new: NewNote) -> Result<Note, tokio_postgres::Error>;
    async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error>;
    async fn delete_note_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error>;
    async fn update_note(&self, id: i64, patch: NotePatch) -> Result<u64, tokio_postgres::Error>;
}

/// Store accessor for the `folders` table.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn list_folders(&self) -> Result<Vec<Folder>, tokio_postgres::Error>;
    async fn insert_folder(&self, new: NewFolder) -> Result<Folder, tokio_postgres::Error>;
    async fn get_folder_by_id(&self, id: i64) -> Result<Option<Folder>, tokio_postgres::Error>;
    async fn delete_folder_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error>;
    async fn update_folder(
        &self,
        id: i64,
        patch: FolderPatch,
    ) -> Result<u64, tokio_postgres::Error>;
}

pub struct Repository {
    client: Client,
}

impl Repository {
    pub async fn new(database_dsn: String) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(&database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        modified: row.get("modified"),
        folder_id: row.get("folder_id"),
    }
}

fn folder_from_row(row: &Row) -> Folder {
    Folder {
        folder_id: row.get("folder_id"),
        title: row.get("title"),
        count: row.get("count"),
    }
}

#[async_trait]
impl NoteStore for Repository {
    async fn list_notes(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT id, title, content, modified, folder_id FROM notes ORDER BY id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn insert_note(&self, new: NewNote) -> Result<Note, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (title, content, modified, folder_id) VALUES ($1, $2, $3, $4) \
                 RETURNING id, title, content, modified, folder_id",
                &[&new.title, &new.content, &new.modified, &new.folder_id],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, modified, folder_id FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error> {
        self.client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await
    }

    async fn update_note(&self, id: i64, patch: NotePatch) -> Result<u64, tokio_postgres::Error> {
        let Some((set_clause, mut params)) = note_update_statement(&patch) else {
            return Ok(0);
        };

        params.push(&id);
        let statement = format!(
            "UPDATE notes SET {} WHERE id = ${}",
            set_clause,
            params.len()
        );

        self.client.execute(statement.as_str(), &params).await
    }
}

/// SET clause and parameters for a partial note update, or `None` for an
/// empty patch: the store must never run a field-less UPDATE or touch rows
/// a caller did not ask to change.
fn note_update_statement(patch: &NotePatch) -> Option<(String, Vec<&(dyn ToSql + Sync)>)> {
    let mut sets: Vec<String> = Vec::new();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    if let Some(title) = &patch.title {
        params.push(title);
        sets.push(format!("title = ${}", params.len()));
    }
    if let Some(content) = &patch.content {
        params.push(content);
        sets.push(format!("content = ${}", params.len()));
    }
    if let Some(modified) = &patch.modified {
        params.push(modified);
        sets.push(format!("modified = ${}", params.len()));
    }
    if let Some(folder_id) = &patch.folder_id {
        params.push(folder_id);
        sets.push(format!("folder_id = ${}", params.len()));
    }

    if sets.is_empty() {
        return None;
    }
    Some((sets.join(", "), params))
}

#[async_trait]
impl FolderStore for Repository {
    async fn list_folders(&self) -> Result<Vec<Folder>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT folder_id, title, count FROM folders ORDER BY folder_id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn insert_folder(&self, new: NewFolder) -> Result<Folder, tokio_postgres::Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO folders (title, count) VALUES ($1, $2) \
                 RETURNING folder_id, title, count",
                &[&new.title, &new.count],
            )
            .await?;

        Ok(folder_from_row(&row))
    }

    async fn get_folder_by_id(&self, id: i64) -> Result<Option<Folder>, tokio_postgres::Error> {
        let row = self
            .client
            .query_opt(
                "SELECT folder_id, title, count FROM folders WHERE folder_id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(folder_from_row))
    }

    async fn delete_folder_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error> {
        self.client
            .execute("DELETE FROM folders WHERE folder_id = $1", &[&id])
            .await
    }

    async fn update_folder(
        &self,
        id: i64,
        patch: FolderPatch,
    ) -> Result<u64, tokio_postgres::Error> {
        // Only the title is updatable. An empty patch is a no-op, not a
        // blanked title.
        let Some(title) = patch.title else {
            return Ok(0);
        };

        self.client
            .execute(
                "UPDATE folders SET title = $1 WHERE folder_id = $2",
                &[&title, &id],
            )
            .await
    }
}
