//! Version chains.
//!
//! A prompt is never edited in place: saving produces a fresh immutable
//! version row sharing the chain's `original_id`. The latest version per
//! chain is the record everything downstream (queries, usage stats) works
//! with; older versions exist only for history and whole-chain deletion.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::db::prompts::{self, Prompt};
use crate::db::Store;
use crate::errors::Result;

/// The caller-editable fields of a prompt; everything else (ids, version
/// number, timestamps, usage counters) is assigned here.
#[derive(Debug, Clone)]
pub struct PromptContent {
    pub title: String,
    pub description: String,
    pub text: String,
    pub tags: Vec<String>,
    pub folder_id: Option<String>,
}

/// Persist a new version.
///
/// With `previous` the new record continues that chain (`version + 1`, same
/// `original_id`); without it a new chain starts at version 1 with
/// `id == original_id`. Usage stats always start from zero; they belong to
/// a version, not a chain. Always an insert: an id collision is a fatal
/// integrity error, never an overwrite.
pub async fn create_version(
    store: &Store,
    content: PromptContent,
    previous: Option<&Prompt>,
) -> Result<Prompt> {
    let prompt = match previous {
        Some(prev) => Prompt {
            id: Uuid::new_v4().to_string(),
            original_id: prev.original_id.clone(),
            version: prev.version + 1,
            title: content.title,
            description: content.description,
            text: content.text,
            tags: content.tags,
            folder_id: content.folder_id,
            created_at: Utc::now(),
            last_used_at: None,
            times_used: 0,
        },
        None => {
            let id = Uuid::new_v4().to_string();
            Prompt {
                id: id.clone(),
                original_id: id,
                version: 1,
                title: content.title,
                description: content.description,
                text: content.text,
                tags: content.tags,
                folder_id: content.folder_id,
                created_at: Utc::now(),
                last_used_at: None,
                times_used: 0,
            }
        },
    };

    prompts::insert(store, &prompt).await?;
    Ok(prompt)
}

/// One record per chain: the highest version, in first-seen chain order.
///
/// Versions are unique within a chain, so the id tie-break never fires in
/// practice; it exists to keep the selection deterministic on bad data.
pub fn latest_versions(records: &[Prompt]) -> Vec<Prompt> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, &Prompt> = HashMap::new();

    for record in records {
        let key = record.original_id.as_str();
        match latest.get(key) {
            None => {
                order.push(key);
                latest.insert(key, record);
            },
            Some(current) => {
                if (record.version, record.id.as_str()) > (current.version, current.id.as_str()) {
                    latest.insert(key, record);
                }
            },
        }
    }

    order
        .into_iter()
        .map(|key| latest[key].clone())
        .collect()
}

/// Number of stored versions per chain, keyed by `original_id`.
pub fn version_counts(records: &[Prompt]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.original_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Record one use of a prompt.
///
/// Usage is always attributed to the chain's current latest version, even
/// when an older version's record triggered it, so the stats stay on the
/// record the views display. The chain is re-read from the store rather than
/// trusted from the caller's possibly stale copy; if it is gone entirely,
/// the passed record itself is updated and written back.
pub async fn record_usage(store: &Store, record: &Prompt) -> Result<Prompt> {
    let chain = prompts::list_by_original_id(store, &record.original_id).await?;
    let mut target = chain.into_iter().next().unwrap_or_else(|| record.clone());

    target.times_used += 1;
    target.last_used_at = Some(Utc::now());

    prompts::upsert(store, &target).await?;
    Ok(target)
}

/// Delete every version of the chain. One indexed statement, so the chain is
/// removed whole or not at all; returns the number of versions removed.
pub async fn delete_chain(store: &Store, original_id: &str) -> Result<u64> {
    prompts::delete_by_original_id(store, original_id).await
}
