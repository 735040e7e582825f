use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::{Confirm, DELETE_PROMPT, DeleteOutcome, LoadState};
use crate::api::BugApi;
use crate::models::{BugFilters, BugReport, Ordering, Page, Severity, Status};

const LOAD_FALLBACK: &str = "Failed to load bugs";
const DELETE_FALLBACK: &str = "Failed to delete bug report";

/// The bug list: filter state, current page and the last response.
///
/// Any filter change resets to page 1 and marks the list stale; callers run
/// [`BugListPage::sync`] to refetch. Deletes never remove rows locally, they
/// refetch.
pub struct BugListPage {
    api: Arc<dyn BugApi>,
    filters: BugFilters,
    state: LoadState<Page<BugReport>>,
    stale: bool,
    notice: Option<String>,
}

impl BugListPage {
    pub fn new(api: Arc<dyn BugApi>, ordering: Ordering) -> Self {
        Self {
            api,
            filters: BugFilters {
                ordering,
                ..Default::default()
            },
            state: LoadState::Idle,
            stale: true,
            notice: None,
        }
    }

    pub fn with_filters(api: Arc<dyn BugApi>, filters: BugFilters) -> Self {
        Self {
            api,
            filters,
            state: LoadState::Idle,
            stale: true,
            notice: None,
        }
    }

    pub fn filters(&self) -> &BugFilters {
        &self.filters
    }

    pub fn current_page(&self) -> u32 {
        self.filters.page
    }

    pub fn state(&self) -> &LoadState<Page<BugReport>> {
        &self.state
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Error from the last failed delete, shown above the list.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn bugs(&self) -> &[BugReport] {
        self.state
            .loaded()
            .map(|page| page.results.as_slice())
            .unwrap_or(&[])
    }

    /// Loaded successfully with zero results.
    pub fn is_empty(&self) -> bool {
        self.state
            .loaded()
            .is_some_and(|page| page.results.is_empty())
    }

    pub fn summary(&self) -> Option<String> {
        self.state.loaded().map(|page| {
            format!("Showing {} of {} bugs", page.results.len(), page.count)
        })
    }

    pub fn has_next(&self) -> bool {
        self.state.loaded().is_some_and(Page::has_next)
    }

    pub fn has_previous(&self) -> bool {
        self.state.loaded().is_some_and(Page::has_previous)
    }

    fn filter_changed(&mut self) {
        self.filters.page = 1;
        self.stale = true;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.search = search.filter(|s| !s.trim().is_empty());
        self.filter_changed();
    }

    pub fn set_severity(&mut self, severity: Option<Severity>) {
        self.filters.severity = severity;
        self.filter_changed();
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        self.filters.status = status;
        self.filter_changed();
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.filters.tag = tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        self.filter_changed();
    }

    pub fn set_ordering(&mut self, ordering: Ordering) {
        self.filters.ordering = ordering;
        self.filter_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filters = BugFilters {
            ordering: self.filters.ordering,
            ..Default::default()
        };
        self.filter_changed();
    }

    /// Move forward when the last response linked a next page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.filters.page += 1;
        self.stale = true;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() || self.filters.page <= 1 {
            return false;
        }
        self.filters.page -= 1;
        self.stale = true;
        true
    }

    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        self.stale = false;
        debug!(page = self.filters.page, "loading bug list");

        self.state = match self.api.list_bugs(&self.filters).await {
            Ok(page) => LoadState::Loaded(page),
            Err(err) => LoadState::Failed(err.display_message(LOAD_FALLBACK)),
        };
    }

    /// Refetch if filters or page changed since the last load.
    pub async fn sync(&mut self) {
        if self.stale {
            self.load().await;
        }
    }

    pub async fn delete(&mut self, id: Uuid, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete_bug(id).await {
            Ok(()) => {
                self.notice = None;
                self.load().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                let message = err.display_message(DELETE_FALLBACK);
                self.notice = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}
