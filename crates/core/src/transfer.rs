//! Whole-dataset import and export.
//!
//! Export dumps everything (all versions of all chains plus all folders)
//! into one snapshot. Import is a destructive replace of the entire dataset:
//! no merge, no dedup against existing records. The snapshot shape
//! `{ prompts: [...], folders: [...] }` with camelCase record keys is the
//! backup file format and must keep round-tripping across releases.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::folders::{self, Folder};
use crate::db::prompts::{self, Prompt};
use crate::db::Store;
use crate::errors::{Result, StashError};

/// Everything the store holds, as one serializable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
}

/// Read the full dataset. No filtering: superseded versions are exported
/// too, so an import restores version history intact.
pub async fn export_all(store: &Store) -> Result<Snapshot> {
    Ok(Snapshot {
        prompts: prompts::list_all(store).await?,
        folders: folders::list_all(store).await?,
    })
}

fn require_array<'a>(data: &'a Value, key: &str) -> Result<&'a Value> {
    data.get(key)
        .filter(|v| v.is_array())
        .ok_or_else(|| StashError::Validation("Invalid file format.".to_string()))
}

/// Parse untrusted snapshot JSON.
///
/// Both collections must be present as arrays and every record must
/// deserialize; anything else is a validation error raised before the
/// store is touched.
pub fn parse_snapshot(data: &Value) -> Result<Snapshot> {
    let prompts_value = require_array(data, "prompts")?;
    let folders_value = require_array(data, "folders")?;

    let prompts: Vec<Prompt> = serde_json::from_value(prompts_value.clone())
        .map_err(|e| StashError::Validation(format!("Invalid file format: {}", e)))?;
    let folders: Vec<Folder> = serde_json::from_value(folders_value.clone())
        .map_err(|e| StashError::Validation(format!("Invalid file format: {}", e)))?;

    Ok(Snapshot { prompts, folders })
}

/// Replace the whole dataset with the given snapshot JSON.
///
/// Validation happens first and rejects without touching existing data.
/// The replace itself (clear both collections, insert folders, then
/// prompts) runs inside a single transaction: a failure partway (say a
/// duplicate id inside the snapshot) rolls back and the pre-import dataset
/// survives. Folders go in first because prompt display and migration
/// expect them to be queryable.
pub async fn import_all(store: &Store, data: &Value) -> Result<()> {
    let snapshot = parse_snapshot(data)?;
    import_snapshot(store, &snapshot).await
}

/// Transactional replace with an already-validated snapshot.
pub async fn import_snapshot(store: &Store, snapshot: &Snapshot) -> Result<()> {
    let mut tx = store.pool().begin().await?;

    sqlx::query("DELETE FROM prompts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM folders").execute(&mut *tx).await?;

    for folder in &snapshot.folders {
        folders::insert_with(&mut *tx, folder).await?;
    }
    for prompt in &snapshot.prompts {
        prompts::insert_with(&mut *tx, prompt).await?;
    }

    tx.commit().await?;

    log::info!(
        "imported dataset: {} prompt versions, {} folders",
        snapshot.prompts.len(),
        snapshot.folders.len()
    );
    Ok(())
}
