//! Startup orchestration.
//!
//! `load_all` is the one entry point that turns a raw store into a
//! consistent in-memory view: it reads both collections, guarantees the
//! default folder exists, and runs the unassigned-prompt repair pass. Any
//! operation that hits an integrity or storage error should be followed by a
//! fresh `load_all` before trusting derived views again.

use crate::db::folders::{self, Folder};
use crate::db::prompts::{self, Prompt};
use crate::db::Store;
use crate::errors::Result;
use crate::hierarchy::ensure_default_folder;

/// Consistent dataset state as of one full read.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Every stored version of every chain
    pub prompts: Vec<Prompt>,
    /// Every folder, default included
    pub folders: Vec<Folder>,
    pub default_folder_id: String,
}

/// Read everything, ensure the default folder, and repair unassigned prompts.
///
/// Prompts with no folder are adopted into the default folder and persisted
/// before this returns, so the sentinel never leaks into query logic. The
/// returned folder list always contains the default folder even when it was
/// created after the initial read.
pub async fn load_all(store: &Store) -> Result<LoadedData> {
    let mut all_prompts = prompts::list_all(store).await?;
    let mut all_folders = folders::list_all(store).await?;
    let default_folder = ensure_default_folder(store).await?;

    if !all_folders.iter().any(|f| f.id == default_folder.id) {
        all_folders.push(default_folder.clone());
    }

    let mut migrated = 0usize;
    for prompt in all_prompts.iter_mut().filter(|p| p.folder_id.is_none()) {
        prompt.folder_id = Some(default_folder.id.clone());
        prompts::upsert(store, prompt).await?;
        migrated += 1;
    }
    if migrated > 0 {
        log::info!(
            "adopted {} unassigned prompt versions into the default folder",
            migrated
        );
    }

    Ok(LoadedData {
        prompts: all_prompts,
        folders: all_folders,
        default_folder_id: default_folder.id,
    })
}
