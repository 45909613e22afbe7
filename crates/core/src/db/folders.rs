use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use super::{map_insert_err, Store};
use crate::errors::Result;

/// A folder node. `parent_id` of `None` means root level.
///
/// The single default folder carries `is_deletable == is_renamable == false`;
/// every user-created folder has both set. Tree shape (`children`, depth) is
/// derived at read time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub is_deletable: bool,
    pub is_renamable: bool,
}

/// Insert a new folder. Duplicate ids map to an integrity error.
pub async fn insert(store: &Store, folder: &Folder) -> Result<()> {
    let mut conn = store.pool().acquire().await?;
    insert_with(&mut conn, folder).await
}

/// Insert through an explicit connection, for transactional bulk loads.
pub(crate) async fn insert_with(conn: &mut SqliteConnection, folder: &Folder) -> Result<()> {
    sqlx::query(
        "INSERT INTO folders (id, name, parent_id, is_deletable, is_renamable)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&folder.id)
    .bind(&folder.name)
    .bind(&folder.parent_id)
    .bind(folder.is_deletable)
    .bind(folder.is_renamable)
    .execute(conn)
    .await
    .map_err(|e| map_insert_err(e, "folder", &folder.id))?;

    Ok(())
}

/// Insert-or-replace a folder, keyed by id.
pub async fn upsert(store: &Store, folder: &Folder) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO folders (id, name, parent_id, is_deletable, is_renamable)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&folder.id)
    .bind(&folder.name)
    .bind(&folder.parent_id)
    .bind(folder.is_deletable)
    .bind(folder.is_renamable)
    .execute(store.pool())
    .await?;

    Ok(())
}

pub async fn get(store: &Store, id: &str) -> Result<Option<Folder>> {
    let folder = sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
        .bind(id)
        .fetch_optional(store.pool())
        .await?;

    Ok(folder)
}

pub async fn list_all(store: &Store) -> Result<Vec<Folder>> {
    let folders = sqlx::query_as::<_, Folder>("SELECT * FROM folders")
        .fetch_all(store.pool())
        .await?;

    Ok(folders)
}

/// All direct children of `parent_id` (`None` = root-level folders).
pub async fn list_by_parent(store: &Store, parent_id: Option<&str>) -> Result<Vec<Folder>> {
    let folders = match parent_id {
        Some(parent) => {
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ?")
                .bind(parent)
                .fetch_all(store.pool())
                .await?
        },
        None => {
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id IS NULL")
                .fetch_all(store.pool())
                .await?
        },
    };

    Ok(folders)
}

/// Remove exactly one folder row. Children are untouched; the hierarchy
/// manager refuses the call before this point if any exist.
pub async fn delete(store: &Store, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM folders WHERE id = ?")
        .bind(id)
        .execute(store.pool())
        .await?;
    Ok(())
}

pub async fn clear(store: &Store) -> Result<()> {
    sqlx::query("DELETE FROM folders")
        .execute(store.pool())
        .await?;
    Ok(())
}
