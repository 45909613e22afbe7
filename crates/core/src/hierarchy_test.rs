#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;
    use tempfile::{tempdir, TempDir};
    use uuid::Uuid;

    use crate::db::folders::{self, Folder};
    use crate::db::prompts::Prompt;
    use crate::db::Store;
    use crate::errors::{Result, StashError};
    use crate::hierarchy::{
        create_folder, delete_folder, ensure_default_folder, is_branch_empty, rename_folder,
        DEFAULT_FOLDER_NAME,
    };
    use crate::versioning::{create_version, delete_chain, PromptContent};

    async fn open_store() -> (TempDir, Store) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hierarchy.db");
        let store = Store::open(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    fn content_in(folder_id: &str) -> PromptContent {
        PromptContent {
            title: "prompt".to_string(),
            description: String::new(),
            text: "body".to_string(),
            tags: vec![],
            folder_id: Some(folder_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_default_folder_created_once() -> Result<()> {
        let (_dir, store) = open_store().await;

        let first = ensure_default_folder(&store).await?;
        let second = ensure_default_folder(&store).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, DEFAULT_FOLDER_NAME);
        assert!(first.parent_id.is_none());
        assert!(!first.is_deletable);
        assert!(!first.is_renamable);

        assert_eq!(folders::list_all(&store).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_case_insensitive_sibling_conflict() -> Result<()> {
        let (_dir, store) = open_store().await;

        create_folder(&store, "Work", None).await?;
        let err = create_folder(&store, "wOrK", None).await.unwrap_err();
        assert!(matches!(err, StashError::Validation(_)), "got {:?}", err);

        // Same name under a different parent is fine
        let other = create_folder(&store, "Other", None).await?;
        create_folder(&store, "Work", Some(&other.id)).await?;

        assert_eq!(folders::list_all(&store).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_created_folders_are_mutable() -> Result<()> {
        let (_dir, store) = open_store().await;

        let folder = create_folder(&store, "Work", None).await?;
        assert!(folder.is_deletable);
        assert!(folder.is_renamable);
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_rules() -> Result<()> {
        let (_dir, store) = open_store().await;

        let work = create_folder(&store, "Work", None).await?;
        create_folder(&store, "Play", None).await?;

        // Conflict with a sibling, nothing written
        let err = rename_folder(&store, &work.id, "play").await.unwrap_err();
        assert!(matches!(err, StashError::Validation(_)));
        assert_eq!(folders::get(&store, &work.id).await?.unwrap().name, "Work");

        // Case-only rename of itself is not a conflict
        let renamed = rename_folder(&store, &work.id, "WORK").await?;
        assert_eq!(renamed.name, "WORK");

        // The default folder silently keeps its name
        let default = ensure_default_folder(&store).await?;
        let unchanged = rename_folder(&store, &default.id, "Misc").await?;
        assert_eq!(unchanged.name, DEFAULT_FOLDER_NAME);
        assert_eq!(
            folders::get(&store, &default.id).await?.unwrap().name,
            DEFAULT_FOLDER_NAME
        );

        let err = rename_folder(&store, "missing", "Anything").await.unwrap_err();
        assert!(matches!(err, StashError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_gating() -> Result<()> {
        let (_dir, store) = open_store().await;

        let default = ensure_default_folder(&store).await?;
        let err = delete_folder(&store, &default.id).await.unwrap_err();
        assert!(matches!(err, StashError::Validation(_)));

        let parent = create_folder(&store, "Parent", None).await?;
        create_folder(&store, "Child", Some(&parent.id)).await?;
        let err = delete_folder(&store, &parent.id).await.unwrap_err();
        assert!(err.to_string().contains("subfolders"), "got {}", err);
        Ok(())
    }

    #[tokio::test]
    async fn test_branch_empties_after_chain_delete() -> Result<()> {
        let (_dir, store) = open_store().await;

        let a = create_folder(&store, "A", None).await?;
        let b = create_folder(&store, "B", Some(&a.id)).await?;
        let prompt = create_version(&store, content_in(&b.id), None).await?;

        let all_folders = folders::list_all(&store).await?;
        let all_prompts = crate::db::prompts::list_all(&store).await?;
        assert!(!is_branch_empty(&a.id, &all_prompts, &all_folders));

        // A prompt anywhere in the branch blocks deletion of the ancestor
        let err = delete_folder(&store, &b.id).await.unwrap_err();
        assert!(err.to_string().contains("not empty"), "got {}", err);

        delete_chain(&store, &prompt.original_id).await?;

        let all_prompts = crate::db::prompts::list_all(&store).await?;
        assert!(is_branch_empty(&a.id, &all_prompts, &all_folders));

        // Bottom-up deletion now succeeds
        delete_folder(&store, &b.id).await?;
        delete_folder(&store, &a.id).await?;
        assert!(folders::list_all(&store).await?.is_empty());
        Ok(())
    }

    fn make_folder(id: String, parent_id: Option<String>) -> Folder {
        Folder {
            name: id.to_uppercase(),
            id,
            parent_id,
            is_deletable: true,
            is_renamable: true,
        }
    }

    fn make_prompt(folder_id: Option<String>) -> Prompt {
        let id = Uuid::new_v4().to_string();
        Prompt {
            id: id.clone(),
            original_id: id,
            version: 1,
            title: "p".to_string(),
            description: String::new(),
            text: String::new(),
            tags: vec![],
            folder_id,
            created_at: Utc::now(),
            last_used_at: None,
            times_used: 0,
        }
    }

    /// Reference implementation: a prompt is in the branch of `target` iff
    /// walking its folder's parent chain reaches `target`.
    fn in_branch_by_ancestor_walk(prompt: &Prompt, target: &str, all: &[Folder]) -> bool {
        let mut current = prompt.folder_id.clone();
        while let Some(id) = current {
            if id == target {
                return true;
            }
            current = all
                .iter()
                .find(|f| f.id == id)
                .and_then(|f| f.parent_id.clone());
        }
        false
    }

    proptest! {
        // Forests are generated acyclic by construction (parents point at
        // strictly earlier folders), covering depth-0 and degenerate
        // single-root shapes among everything else.
        #[test]
        fn branch_emptiness_matches_ancestor_walk(
            parents in proptest::collection::vec(proptest::option::of(0usize..8), 1..8),
            assignments in proptest::collection::vec(proptest::option::of(0usize..8), 0..10),
        ) {
            let n = parents.len();
            let all_folders: Vec<Folder> = parents
                .iter()
                .enumerate()
                .map(|(i, parent)| {
                    let parent_id = parent.filter(|&p| p < i).map(|p| format!("f{}", p));
                    make_folder(format!("f{}", i), parent_id)
                })
                .collect();
            let all_prompts: Vec<Prompt> = assignments
                .iter()
                .map(|slot| make_prompt(slot.map(|s| format!("f{}", s % n))))
                .collect();

            for k in 0..n {
                let target = format!("f{}", k);
                let expected_empty = !all_prompts
                    .iter()
                    .any(|p| in_branch_by_ancestor_walk(p, &target, &all_folders));
                prop_assert_eq!(
                    is_branch_empty(&target, &all_prompts, &all_folders),
                    expected_empty,
                    "folder {}", target
                );
            }
        }
    }
}
