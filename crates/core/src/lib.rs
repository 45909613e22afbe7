//! promptstash: local-first manager for versioned AI prompts
//!
//! Prompts are immutable version chains organized into a folder tree and
//! persisted in an embedded SQLite database. This crate is the whole data
//! core; any UI sits on top of it and talks through the types re-exported
//! here:
//!
//! - **`db`**: the record store, two indexed collections (prompt versions,
//!   folders) behind an explicit [`Store`] handle
//! - **`versioning`**: version chains, latest-per-chain resolution, usage
//!   stats, whole-chain deletion
//! - **`hierarchy`**: the folder tree, sibling-name rules, the protected
//!   default folder, branch emptiness
//! - **`transfer`**: full-dataset export and destructive import
//! - **`query`**: filter/sort/paginate over the latest versions
//! - **`manager`**: [`load_all`], the startup sequence producing a
//!   consistent view
//!
//! Derived views are always recomputed from a fresh full read; nothing in
//! this crate patches a cached view incrementally.

// Module declarations
pub mod db;
pub mod errors;
pub mod hierarchy;
pub mod manager;
pub mod query;
pub mod template;
pub mod transfer;
pub mod versioning;

#[cfg(test)]
mod hierarchy_test;
#[cfg(test)]
mod manager_test;

pub use db::folders::Folder;
pub use db::prompts::Prompt;
pub use db::Store;
pub use errors::{Result, StashError};
pub use hierarchy::{FolderNode, DEFAULT_FOLDER_NAME};
pub use manager::{load_all, LoadedData};
pub use query::{Filter, Page, PromptQuery, SortOption, PROMPTS_PER_PAGE};
pub use transfer::Snapshot;
pub use versioning::PromptContent;
