use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::{map_insert_err, Store};
use crate::errors::{Result, StashError};

/// One stored version of a prompt.
///
/// Every edit produces a fresh row; all versions of the same prompt share
/// `original_id`, and the first version has `id == original_id`. Only
/// `last_used_at` and `times_used` are ever rewritten after creation.
///
/// Serializes with camelCase keys, which is also the export file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub original_id: String,
    pub version: i64,
    pub title: String,
    pub description: String,
    pub text: String,
    pub tags: Vec<String>,
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub times_used: i64,
}

/// Raw table row; tags are a JSON-encoded TEXT column.
#[derive(FromRow)]
struct PromptRow {
    id: String,
    original_id: String,
    version: i64,
    title: String,
    description: String,
    text: String,
    tags: String,
    folder_id: Option<String>,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    times_used: i64,
}

impl TryFrom<PromptRow> for Prompt {
    type Error = StashError;

    fn try_from(row: PromptRow) -> Result<Prompt> {
        Ok(Prompt {
            id: row.id,
            original_id: row.original_id,
            version: row.version,
            title: row.title,
            description: row.description,
            text: row.text,
            tags: serde_json::from_str(&row.tags)?,
            folder_id: row.folder_id,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
            times_used: row.times_used,
        })
    }
}

/// Insert a new version row. Fails with an integrity error if the id is
/// already present; callers never overwrite through this path.
pub async fn insert(store: &Store, prompt: &Prompt) -> Result<()> {
    let mut conn = store.pool().acquire().await?;
    insert_with(&mut conn, prompt).await
}

/// Insert through an explicit connection, so bulk operations can batch many
/// inserts into one transaction.
pub(crate) async fn insert_with(conn: &mut SqliteConnection, prompt: &Prompt) -> Result<()> {
    let tags_json = serde_json::to_string(&prompt.tags)?;

    sqlx::query(
        "INSERT INTO prompts (id, original_id, version, title, description, text, tags, folder_id, created_at, last_used_at, times_used)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&prompt.id)
    .bind(&prompt.original_id)
    .bind(prompt.version)
    .bind(&prompt.title)
    .bind(&prompt.description)
    .bind(&prompt.text)
    .bind(&tags_json)
    .bind(&prompt.folder_id)
    .bind(prompt.created_at)
    .bind(prompt.last_used_at)
    .bind(prompt.times_used)
    .execute(conn)
    .await
    .map_err(|e| map_insert_err(e, "prompt version", &prompt.id))?;

    Ok(())
}

/// Insert-or-replace a version row, keyed by id.
pub async fn upsert(store: &Store, prompt: &Prompt) -> Result<()> {
    let tags_json = serde_json::to_string(&prompt.tags)?;

    sqlx::query(
        "INSERT OR REPLACE INTO prompts (id, original_id, version, title, description, text, tags, folder_id, created_at, last_used_at, times_used)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&prompt.id)
    .bind(&prompt.original_id)
    .bind(prompt.version)
    .bind(&prompt.title)
    .bind(&prompt.description)
    .bind(&prompt.text)
    .bind(&tags_json)
    .bind(&prompt.folder_id)
    .bind(prompt.created_at)
    .bind(prompt.last_used_at)
    .bind(prompt.times_used)
    .execute(store.pool())
    .await?;

    Ok(())
}

pub async fn get(store: &Store, id: &str) -> Result<Option<Prompt>> {
    let row = sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE id = ?")
        .bind(id)
        .fetch_optional(store.pool())
        .await?;

    row.map(Prompt::try_from).transpose()
}

pub async fn list_all(store: &Store) -> Result<Vec<Prompt>> {
    let rows = sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts")
        .fetch_all(store.pool())
        .await?;

    rows.into_iter().map(Prompt::try_from).collect()
}

/// All versions of one chain, newest version first. The id tie-break keeps
/// the order total even if duplicate version numbers ever slip in.
pub async fn list_by_original_id(store: &Store, original_id: &str) -> Result<Vec<Prompt>> {
    let rows = sqlx::query_as::<_, PromptRow>(
        "SELECT * FROM prompts WHERE original_id = ? ORDER BY version DESC, id DESC",
    )
    .bind(original_id)
    .fetch_all(store.pool())
    .await?;

    rows.into_iter().map(Prompt::try_from).collect()
}

/// Delete every version of a chain; returns the number of rows removed.
/// Runs as one statement, so the chain is never left half-deleted.
pub async fn delete_by_original_id(store: &Store, original_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM prompts WHERE original_id = ?")
        .bind(original_id)
        .execute(store.pool())
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear(store: &Store) -> Result<()> {
    sqlx::query("DELETE FROM prompts")
        .execute(store.pool())
        .await?;
    Ok(())
}
