//! Filtering, sorting, and pagination over the latest-per-chain view.
//!
//! Everything here is pure: callers pass the freshly derived latest list and
//! the current folder set, and get back a page. `PromptQuery` adds the one
//! bit of statefulness the views need: the current page resets to 1 whenever
//! any filter or sort criterion changes.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::db::folders::Folder;
use crate::db::prompts::Prompt;
use crate::hierarchy::branch_folder_ids;

/// Fixed page size for prompt listings.
pub const PROMPTS_PER_PAGE: usize = 12;

/// Sort orders for the prompt list. The serde values are the persisted
/// identifiers of each option and must stay stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    NameAsc,
    NameDesc,
    MostUsed,
    #[default]
    RecentlyUsed,
    DateCreatedAsc,
    DateCreatedDesc,
}

impl SortOption {
    /// Display label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::MostUsed => "Most Used",
            SortOption::RecentlyUsed => "Recently Used",
            SortOption::DateCreatedAsc => "Date Created (Oldest)",
            SortOption::DateCreatedDesc => "Date Created (Newest)",
        }
    }
}

/// Filter stages, applied in order: folder branch, then free-text search,
/// then tag equality. Unset stages pass everything through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Restrict to this folder's branch (the folder and all descendants)
    pub folder_id: Option<String>,
    /// Case-insensitive substring over title, description, and text
    pub search: Option<String>,
    /// Exact tag match
    pub tag: Option<String>,
}

pub fn filter_prompts(prompts: &[Prompt], filter: &Filter, all_folders: &[Folder]) -> Vec<Prompt> {
    let mut filtered: Vec<Prompt> = prompts.to_vec();

    if let Some(folder_id) = &filter.folder_id {
        let branch: HashSet<String> =
            branch_folder_ids(folder_id, all_folders).into_iter().collect();
        filtered.retain(|p| p.folder_id.as_ref().is_some_and(|f| branch.contains(f)));
    }

    if let Some(term) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let term = term.to_lowercase();
        filtered.retain(|p| {
            p.title.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
                || p.text.to_lowercase().contains(&term)
        });
    }

    if let Some(tag) = &filter.tag {
        filtered.retain(|p| p.tags.iter().any(|t| t == tag));
    }

    filtered
}

fn compare_titles(a: &Prompt, b: &Prompt) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

/// Never-used records sort after everything that has been used; two
/// never-used records stay in their incoming order.
fn compare_recently_used(a: &Prompt, b: &Prompt) -> Ordering {
    match (a.last_used_at, b.last_used_at) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a_used), Some(b_used)) => b_used.cmp(&a_used),
    }
}

pub fn sort_prompts(prompts: &mut [Prompt], sort: SortOption) {
    match sort {
        SortOption::NameAsc => prompts.sort_by(compare_titles),
        SortOption::NameDesc => prompts.sort_by(|a, b| compare_titles(b, a)),
        SortOption::MostUsed => prompts.sort_by(|a, b| b.times_used.cmp(&a.times_used)),
        SortOption::RecentlyUsed => prompts.sort_by(compare_recently_used),
        SortOption::DateCreatedAsc => prompts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOption::DateCreatedDesc => prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// One page of results plus enough context to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Prompt>,
    /// 1-based page index as requested (an out-of-range page is empty)
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

pub fn paginate(prompts: &[Prompt], page: usize) -> Page {
    let total_items = prompts.len();
    let total_pages = total_items.div_ceil(PROMPTS_PER_PAGE);
    let page = page.max(1);
    let items = prompts
        .iter()
        .skip((page - 1) * PROMPTS_PER_PAGE)
        .take(PROMPTS_PER_PAGE)
        .cloned()
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// Every distinct tag across the given prompts, sorted.
pub fn all_tags(prompts: &[Prompt]) -> Vec<String> {
    let mut tags: Vec<String> = prompts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Current filter + sort + page selection.
///
/// Changing any criterion snaps the page back to 1, so a narrowed result
/// set never leaves the caller stranded past the last page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptQuery {
    filter: Filter,
    sort: SortOption,
    page: usize,
}

impl PromptQuery {
    pub fn new() -> Self {
        PromptQuery {
            filter: Filter::default(),
            sort: SortOption::default(),
            page: 1,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn set_folder(&mut self, folder_id: Option<String>) {
        if self.filter.folder_id != folder_id {
            self.filter.folder_id = folder_id;
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, search: Option<String>) {
        if self.filter.search != search {
            self.filter.search = search;
            self.page = 1;
        }
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        if self.filter.tag != tag {
            self.filter.tag = tag;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        if self.sort != sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Filter, sort, and slice the latest-per-chain list into the current page.
    pub fn run(&self, latest: &[Prompt], all_folders: &[Folder]) -> Page {
        let mut filtered = filter_prompts(latest, &self.filter, all_folders);
        sort_prompts(&mut filtered, self.sort);
        paginate(&filtered, self.page())
    }
}
