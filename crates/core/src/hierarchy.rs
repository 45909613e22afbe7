//! Folder tree management.
//!
//! Folders form a forest: every folder has at most one parent, sibling names
//! are unique case-insensitively, and one protected root folder catches
//! everything unassigned. The tree shape handed to callers (`FolderNode`) is
//! derived from the flat rows on every read; nothing derived is persisted.
//!
//! All traversals carry a visited set. The store never validates acyclicity,
//! so a malformed parent chain must degrade to a finite walk, not a hang.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::db::folders::{self, Folder};
use crate::db::prompts::Prompt;
use crate::db::{prompts, Store};
use crate::errors::{Result, StashError};
use crate::versioning::latest_versions;

/// Reserved name of the protected root folder for unassigned prompts.
pub const DEFAULT_FOLDER_NAME: &str = "Uncategorized";

/// A folder with its derived position in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    #[serde(flatten)]
    pub folder: Folder,
    /// Depth from root, 0-based
    pub level: usize,
    pub children: Vec<FolderNode>,
}

async fn find_default(store: &Store) -> Result<Option<Folder>> {
    let roots = folders::list_by_parent(store, None).await?;
    Ok(roots.into_iter().find(|f| f.name == DEFAULT_FOLDER_NAME))
}

/// Return the default folder, creating it on first access.
///
/// Existence is re-checked immediately before the insert: the lookup and the
/// write are separate await points, and two interleaved calls must converge
/// on one folder instead of creating twins.
pub async fn ensure_default_folder(store: &Store) -> Result<Folder> {
    if let Some(existing) = find_default(store).await? {
        return Ok(existing);
    }

    if let Some(existing) = find_default(store).await? {
        return Ok(existing);
    }

    let folder = Folder {
        id: Uuid::new_v4().to_string(),
        name: DEFAULT_FOLDER_NAME.to_string(),
        parent_id: None,
        is_deletable: false,
        is_renamable: false,
    };
    folders::insert(store, &folder).await?;

    log::info!("created default folder {}", folder.id);
    Ok(folder)
}

fn sibling_name_taken(siblings: &[Folder], name: &str, exclude_id: Option<&str>) -> bool {
    let lowered = name.to_lowercase();
    siblings
        .iter()
        .filter(|s| Some(s.id.as_str()) != exclude_id)
        .any(|s| s.name.to_lowercase() == lowered)
}

/// Create a folder under `parent_id` (`None` = root level).
///
/// Rejected before any write when a sibling already uses the name,
/// compared case-insensitively.
pub async fn create_folder(store: &Store, name: &str, parent_id: Option<&str>) -> Result<Folder> {
    let siblings = folders::list_by_parent(store, parent_id).await?;
    if sibling_name_taken(&siblings, name, None) {
        return Err(StashError::Validation(format!(
            "A folder named \"{}\" already exists in this location.",
            name
        )));
    }

    let folder = Folder {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        parent_id: parent_id.map(String::from),
        is_deletable: true,
        is_renamable: true,
    };
    folders::insert(store, &folder).await?;

    Ok(folder)
}

/// Rename a folder.
///
/// A non-renamable folder (the default one) is a silent no-op returning the
/// unchanged record. Sibling-name uniqueness excludes the folder itself, so
/// case-only renames of the same folder go through.
pub async fn rename_folder(store: &Store, folder_id: &str, new_name: &str) -> Result<Folder> {
    let folder = folders::get(store, folder_id)
        .await?
        .ok_or_else(|| StashError::Validation(format!("Folder not found: {}", folder_id)))?;

    if !folder.is_renamable {
        return Ok(folder);
    }

    let siblings = folders::list_by_parent(store, folder.parent_id.as_deref()).await?;
    if sibling_name_taken(&siblings, new_name, Some(folder_id)) {
        return Err(StashError::Validation(format!(
            "A folder named \"{}\" already exists in this location.",
            new_name
        )));
    }

    let updated = Folder {
        name: new_name.to_string(),
        ..folder
    };
    folders::upsert(store, &updated).await?;

    Ok(updated)
}

/// Delete one folder node.
///
/// Refused (nothing written) when the folder is protected, still has child
/// folders, or any latest-version prompt lives in its branch. Children are
/// the caller's job, bottom-up; there is no cascade.
pub async fn delete_folder(store: &Store, folder_id: &str) -> Result<()> {
    let folder = folders::get(store, folder_id)
        .await?
        .ok_or_else(|| StashError::Validation(format!("Folder not found: {}", folder_id)))?;

    if !folder.is_deletable {
        return Err(StashError::Validation(
            "This folder cannot be deleted.".to_string(),
        ));
    }

    let all_folders = folders::list_all(store).await?;
    let has_children = all_folders
        .iter()
        .any(|f| f.parent_id.as_deref() == Some(folder_id));
    if has_children {
        return Err(StashError::Validation(
            "Please delete all subfolders before deleting this folder.".to_string(),
        ));
    }

    let all_prompts = prompts::list_all(store).await?;
    let latest = latest_versions(&all_prompts);
    if !is_branch_empty(folder_id, &latest, &all_folders) {
        return Err(StashError::Validation(
            "Folder is not empty. Please remove or move prompts before deleting.".to_string(),
        ));
    }

    folders::delete(store, folder_id).await
}

/// The closed descendant set of a folder: itself plus every folder reachable
/// through `parent_id` edges, unordered.
pub fn branch_folder_ids(folder_id: &str, all_folders: &[Folder]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![folder_id];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        ids.push(id.to_string());
        for child in all_folders.iter().filter(|f| f.parent_id.as_deref() == Some(id)) {
            stack.push(child.id.as_str());
        }
    }

    ids
}

/// True iff no prompt in `prompts` lives in the closed branch of `folder_id`.
/// The sole authority for whether a subtree may be removed.
pub fn is_branch_empty(folder_id: &str, prompts: &[Prompt], all_folders: &[Folder]) -> bool {
    let branch: HashSet<String> = branch_folder_ids(folder_id, all_folders).into_iter().collect();
    !prompts.iter().any(|p| {
        p.folder_id
            .as_ref()
            .is_some_and(|f| branch.contains(f))
    })
}

/// Build the display tree from the flat folder list, starting at root.
/// Siblings are ordered by name, case-insensitively.
pub fn build_hierarchy(all_folders: &[Folder]) -> Vec<FolderNode> {
    let mut visited = HashSet::new();
    build_level(all_folders, None, 0, &mut visited)
}

fn build_level(
    all_folders: &[Folder],
    parent_id: Option<&str>,
    level: usize,
    visited: &mut HashSet<String>,
) -> Vec<FolderNode> {
    let mut nodes = Vec::new();
    for f in all_folders.iter().filter(|f| f.parent_id.as_deref() == parent_id) {
        if !visited.insert(f.id.clone()) {
            continue;
        }
        nodes.push(FolderNode {
            level,
            children: build_level(all_folders, Some(&f.id), level + 1, visited),
            folder: f.clone(),
        });
    }

    nodes.sort_by(|a, b| {
        a.folder
            .name
            .to_lowercase()
            .cmp(&b.folder.name.to_lowercase())
    });
    nodes
}

/// Flatten the tree depth-first, parent before children, each display name
/// prefixed with its ancestors: `Parent / Child`. For flat pickers.
pub fn flatten_hierarchy(nodes: &[FolderNode]) -> Vec<Folder> {
    fn traverse(nodes: &[FolderNode], prefix: &str, flat: &mut Vec<Folder>) {
        for node in nodes {
            let mut folder = node.folder.clone();
            folder.name = format!("{}{}", prefix, folder.name);
            flat.push(folder);
            if !node.children.is_empty() {
                let child_prefix = format!("{}{} / ", prefix, node.folder.name);
                traverse(&node.children, &child_prefix, flat);
            }
        }
    }

    let mut flat = Vec::new();
    traverse(nodes, "", &mut flat);
    flat
}
