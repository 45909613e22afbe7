#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::{tempdir, TempDir};
    use uuid::Uuid;

    use crate::db::prompts::{self, Prompt};
    use crate::db::{folders, Store};
    use crate::errors::Result;
    use crate::hierarchy::DEFAULT_FOLDER_NAME;
    use crate::manager::load_all;
    use crate::versioning::{create_version, PromptContent};

    async fn open_store() -> (TempDir, Store) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manager.db");
        let store = Store::open(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    fn unassigned_prompt(title: &str) -> Prompt {
        let id = Uuid::new_v4().to_string();
        Prompt {
            id: id.clone(),
            original_id: id,
            version: 1,
            title: title.to_string(),
            description: String::new(),
            text: "body".to_string(),
            tags: vec![],
            folder_id: None,
            created_at: Utc::now(),
            last_used_at: None,
            times_used: 0,
        }
    }

    #[tokio::test]
    async fn test_load_on_empty_store_creates_default_folder() -> Result<()> {
        let (_dir, store) = open_store().await;

        let loaded = load_all(&store).await?;

        assert!(loaded.prompts.is_empty());
        assert_eq!(loaded.folders.len(), 1);
        assert_eq!(loaded.folders[0].name, DEFAULT_FOLDER_NAME);
        assert_eq!(loaded.folders[0].id, loaded.default_folder_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_twice_reuses_the_default_folder() -> Result<()> {
        let (_dir, store) = open_store().await;

        let first = load_all(&store).await?;
        let second = load_all(&store).await?;

        assert_eq!(first.default_folder_id, second.default_folder_id);
        assert_eq!(folders::list_all(&store).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unassigned_prompts_are_adopted_and_persisted() -> Result<()> {
        let (_dir, store) = open_store().await;

        // Two stranded versions, written below the chain manager
        prompts::insert(&store, &unassigned_prompt("one")).await?;
        prompts::insert(&store, &unassigned_prompt("two")).await?;

        let loaded = load_all(&store).await?;
        assert!(loaded
            .prompts
            .iter()
            .all(|p| p.folder_id.as_deref() == Some(loaded.default_folder_id.as_str())));

        // The repair was written back, not just patched in memory
        let stored = prompts::list_all(&store).await?;
        assert!(stored
            .iter()
            .all(|p| p.folder_id.as_deref() == Some(loaded.default_folder_id.as_str())));
        Ok(())
    }

    #[tokio::test]
    async fn test_assigned_prompts_keep_their_folder() -> Result<()> {
        let (_dir, store) = open_store().await;

        let loaded = load_all(&store).await?;
        let content = PromptContent {
            title: "stays put".to_string(),
            description: String::new(),
            text: "body".to_string(),
            tags: vec![],
            folder_id: Some(loaded.default_folder_id.clone()),
        };
        create_version(&store, content, None).await?;

        let home = crate::hierarchy::create_folder(&store, "Home", None).await?;
        let content = PromptContent {
            title: "homed".to_string(),
            description: String::new(),
            text: "body".to_string(),
            tags: vec![],
            folder_id: Some(home.id.clone()),
        };
        create_version(&store, content, None).await?;

        let reloaded = load_all(&store).await?;
        let homed = reloaded
            .prompts
            .iter()
            .find(|p| p.title == "homed")
            .unwrap();
        assert_eq!(homed.folder_id.as_deref(), Some(home.id.as_str()));
        Ok(())
    }
}
