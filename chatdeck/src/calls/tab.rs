use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context as _;
use parking_lot::RwLock;

use crate::config::Settings;
use crate::models::{
    CallHistoryFilter, CallHistoryFilterOptions, CallHistoryGroup, CallHistoryPagination,
    ConversationSummary,
};
use crate::search::ConversationSearch;

use super::{CallHistoryStore, build_call_history_filter};

/// Result of a store query together with the input revision it was computed
/// from.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    pub revision: u64,
    pub value: T,
}

struct Inputs {
    conversations: Arc<Vec<ConversationSummary>>,
    region_code: Option<String>,
    // Bumped by the store owner whenever call history changes.
    edition: u64,
    // Bumped whenever any of the above changes.
    revision: u64,
}

struct Snapshot {
    conversations: Arc<Vec<ConversationSummary>>,
    region_code: Option<String>,
    edition: u64,
    revision: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallsTabProps {
    pub nav_tabs_collapsed: bool,
    pub preferred_left_pane_width: u32,
    pub region_code: Option<String>,
}

/// Serves the calls list: turns search options into store queries against
/// the current conversations, region and call history edition.
pub struct CallsTab {
    store: Arc<dyn CallHistoryStore>,
    search: Arc<dyn ConversationSearch>,
    inputs: RwLock<Inputs>,
}

impl CallsTab {
    pub fn new(store: Arc<dyn CallHistoryStore>, search: Arc<dyn ConversationSearch>) -> Self {
        Self {
            store,
            search,
            inputs: RwLock::new(Inputs {
                conversations: Arc::new(Vec::new()),
                region_code: None,
                edition: 0,
                revision: 0,
            }),
        }
    }

    pub fn set_conversations(&self, conversations: Vec<ConversationSummary>) {
        let mut inputs = self.inputs.write();
        if *inputs.conversations == conversations {
            return;
        }
        inputs.conversations = Arc::new(conversations);
        inputs.revision += 1;
    }

    pub fn set_region_code(&self, region_code: Option<String>) {
        let mut inputs = self.inputs.write();
        if inputs.region_code == region_code {
            return;
        }
        inputs.region_code = region_code;
        inputs.revision += 1;
    }

    pub fn set_call_history_edition(&self, edition: u64) {
        let mut inputs = self.inputs.write();
        if inputs.edition == edition {
            return;
        }
        inputs.edition = edition;
        inputs.revision += 1;
    }

    pub fn call_history_edition(&self) -> u64 {
        self.inputs.read().edition
    }

    pub fn revision(&self) -> u64 {
        self.inputs.read().revision
    }

    pub fn conversations(&self) -> Arc<Vec<ConversationSummary>> {
        self.inputs.read().conversations.clone()
    }

    pub fn get_conversation(&self, id: &str) -> Option<ConversationSummary> {
        let inputs = self.inputs.read();
        inputs.conversations.iter().find(|c| c.id == id).cloned()
    }

    pub fn props(&self, settings: &Settings) -> CallsTabProps {
        CallsTabProps {
            nav_tabs_collapsed: settings.nav_tabs_collapsed,
            preferred_left_pane_width: settings.preferred_left_pane_width,
            region_code: self.inputs.read().region_code.clone(),
        }
    }

    pub async fn get_call_history_groups_count(
        &self,
        options: &CallHistoryFilterOptions,
    ) -> Result<Fetched<usize>, anyhow::Error> {
        let snapshot = self.snapshot();
        tracing::info!(edition = snapshot.edition, "getCallHistoryGroupsCount");
        let Some(filter) = self.filter(&snapshot, options) else {
            return Ok(Fetched {
                revision: snapshot.revision,
                value: 0,
            });
        };
        let count = self
            .store
            .count_call_history_groups(&filter)
            .await
            .context("Failed to count call history groups")?;
        tracing::info!(count, ?filter, "getCallHistoryGroupsCount");
        Ok(Fetched {
            revision: snapshot.revision,
            value: count,
        })
    }

    pub async fn get_call_history_groups(
        &self,
        options: &CallHistoryFilterOptions,
        pagination: CallHistoryPagination,
    ) -> Result<Fetched<Vec<CallHistoryGroup>>, anyhow::Error> {
        let snapshot = self.snapshot();
        tracing::info!(edition = snapshot.edition, "getCallHistoryGroups");
        let Some(filter) = self.filter(&snapshot, options) else {
            return Ok(Fetched {
                revision: snapshot.revision,
                value: Vec::new(),
            });
        };
        let groups = self
            .store
            .get_call_history_groups(&filter, pagination)
            .await
            .context("Failed to fetch call history groups")?;
        tracing::info!(results = groups.len(), ?filter, ?pagination, "getCallHistoryGroups");
        Ok(Fetched {
            revision: snapshot.revision,
            value: groups,
        })
    }

    /// Clears the store and moves to a new call history edition.
    pub async fn clear_call_history(&self) -> Result<(), anyhow::Error> {
        self.store
            .clear_call_history()
            .await
            .context("Failed to clear call history")?;
        let mut inputs = self.inputs.write();
        inputs.edition += 1;
        inputs.revision += 1;
        tracing::info!(edition = inputs.edition, "Call history cleared");
        Ok(())
    }

    /// Whether `fetched` was computed from the current inputs.
    pub fn is_current<T>(&self, fetched: &Fetched<T>) -> bool {
        fetched.revision == self.revision()
    }

    /// Unwraps `fetched` if it is current, drops it otherwise.
    pub fn accept<T>(&self, fetched: Fetched<T>) -> Option<T> {
        if self.is_current(&fetched) {
            Some(fetched.value)
        } else {
            tracing::debug!(
                revision = fetched.revision,
                current = self.revision(),
                "Discarding stale call history result"
            );
            None
        }
    }

    fn snapshot(&self) -> Snapshot {
        let inputs = self.inputs.read();
        Snapshot {
            conversations: inputs.conversations.clone(),
            region_code: inputs.region_code.clone(),
            edition: inputs.edition,
            revision: inputs.revision,
        }
    }

    fn filter(
        &self,
        snapshot: &Snapshot,
        options: &CallHistoryFilterOptions,
    ) -> Option<CallHistoryFilter> {
        build_call_history_filter(
            self.search.as_ref(),
            &snapshot.conversations,
            snapshot.region_code.as_deref(),
            options,
        )
    }
}

/// Rows of the calls list as seen by the UI. Results from outdated inputs
/// never replace fresher ones, and results for other filter options start
/// the list over.
#[derive(Debug, Default)]
pub struct CallHistoryList {
    key: Option<(u64, CallHistoryFilterOptions)>,
    count: Option<usize>,
    groups: BTreeMap<usize, CallHistoryGroup>,
}

impl CallHistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn group(&self, index: usize) -> Option<&CallHistoryGroup> {
        self.groups.get(&index)
    }

    pub fn loaded_groups(&self) -> impl Iterator<Item = (usize, &CallHistoryGroup)> {
        self.groups.iter().map(|(index, group)| (*index, group))
    }

    /// Applies a count fetched for `options`; returns false if it was stale.
    pub fn apply_count(
        &mut self,
        tab: &CallsTab,
        options: &CallHistoryFilterOptions,
        fetched: Fetched<usize>,
    ) -> bool {
        let revision = fetched.revision;
        let Some(count) = tab.accept(fetched) else {
            return false;
        };
        self.reset_if_outdated(revision, options);
        self.count = Some(count);
        self.groups.retain(|index, _| *index < count);
        true
    }

    /// Places a page fetched for `options` at its offset; returns false if
    /// it was stale.
    pub fn apply_page(
        &mut self,
        tab: &CallsTab,
        options: &CallHistoryFilterOptions,
        pagination: CallHistoryPagination,
        fetched: Fetched<Vec<CallHistoryGroup>>,
    ) -> bool {
        let revision = fetched.revision;
        let Some(groups) = tab.accept(fetched) else {
            return false;
        };
        self.reset_if_outdated(revision, options);
        for (i, group) in groups.into_iter().enumerate() {
            self.groups.insert(pagination.offset + i, group);
        }
        true
    }

    fn reset_if_outdated(&mut self, revision: u64, options: &CallHistoryFilterOptions) {
        let current = matches!(
            &self.key,
            Some((seen, seen_options)) if *seen == revision && seen_options == options
        );
        if !current {
            self.key = Some((revision, options.clone()));
            self.count = None;
            self.groups.clear();
        }
    }
}
