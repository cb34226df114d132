use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::{
    CallHistoryDetails, CallHistoryFilter, CallHistoryFilterStatus, CallHistoryGroup,
    CallHistoryGroupChild, CallHistoryPagination, CallStatus,
};

/// Calls within this window of the newest call of a group join the group.
pub const GROUP_WINDOW_MILLIS: i64 = 4 * 60 * 60 * 1000;

/// Source of grouped call history. Both queries are idempotent.
#[async_trait]
pub trait CallHistoryStore: Send + Sync {
    async fn count_call_history_groups(
        &self,
        filter: &CallHistoryFilter,
    ) -> Result<usize, anyhow::Error>;

    async fn get_call_history_groups(
        &self,
        filter: &CallHistoryFilter,
        pagination: CallHistoryPagination,
    ) -> Result<Vec<CallHistoryGroup>, anyhow::Error>;

    /// Removes every call from history.
    async fn clear_call_history(&self) -> Result<(), anyhow::Error>;
}

/// Call history kept in memory.
#[derive(Default)]
pub struct MemoryCallHistory {
    calls: RwLock<Vec<CallHistoryDetails>>,
}

impl MemoryCallHistory {
    pub fn new(calls: Vec<CallHistoryDetails>) -> Self {
        Self {
            calls: RwLock::new(calls),
        }
    }

    pub fn add_call(&self, call: CallHistoryDetails) {
        self.calls.write().push(call);
    }

    pub fn clear(&self) {
        self.calls.write().clear();
    }

    pub fn len(&self) -> usize {
        self.calls.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.read().is_empty()
    }

    fn groups(&self, filter: &CallHistoryFilter) -> Vec<CallHistoryGroup> {
        let calls = self.calls.read();
        let mut matching: Vec<&CallHistoryDetails> =
            calls.iter().filter(|call| Self::matches(call, filter)).collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut groups: Vec<CallHistoryGroup> = Vec::new();
        for call in matching {
            let child = CallHistoryGroupChild {
                call_id: call.call_id.clone(),
                timestamp: call.timestamp,
            };
            match groups.last_mut() {
                Some(group) if Self::joins(group, call) => group.children.push(child),
                _ => groups.push(CallHistoryGroup {
                    peer_id: call.peer_id.clone(),
                    mode: call.mode,
                    call_type: call.call_type,
                    direction: call.direction,
                    status: call.status,
                    timestamp: call.timestamp,
                    children: vec![child],
                }),
            }
        }
        groups
    }

    fn matches(call: &CallHistoryDetails, filter: &CallHistoryFilter) -> bool {
        if call.status == CallStatus::Deleted {
            return false;
        }
        if filter.status == CallHistoryFilterStatus::Missed && call.status != CallStatus::Missed {
            return false;
        }
        match &filter.conversation_ids {
            Some(ids) => ids.iter().any(|id| *id == call.peer_id),
            None => true,
        }
    }

    fn joins(group: &CallHistoryGroup, call: &CallHistoryDetails) -> bool {
        group.peer_id == call.peer_id
            && group.mode == call.mode
            && group.call_type == call.call_type
            && group.direction == call.direction
            && group.status == call.status
            && group.timestamp.millis() - call.timestamp.millis() <= GROUP_WINDOW_MILLIS
    }
}

#[async_trait]
impl CallHistoryStore for MemoryCallHistory {
    async fn count_call_history_groups(
        &self,
        filter: &CallHistoryFilter,
    ) -> Result<usize, anyhow::Error> {
        Ok(self.groups(filter).len())
    }

    async fn get_call_history_groups(
        &self,
        filter: &CallHistoryFilter,
        pagination: CallHistoryPagination,
    ) -> Result<Vec<CallHistoryGroup>, anyhow::Error> {
        Ok(self
            .groups(filter)
            .into_iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .collect())
    }

    async fn clear_call_history(&self) -> Result<(), anyhow::Error> {
        self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{CallDirection, CallMode, CallType, DateTime};

    use super::*;

    const HOUR: i64 = 60 * 60 * 1000;

    fn call(id: &str, peer: &str, status: CallStatus, at: i64) -> CallHistoryDetails {
        CallHistoryDetails {
            call_id: id.to_string(),
            peer_id: peer.to_string(),
            ringer_id: None,
            mode: CallMode::Direct,
            call_type: CallType::Audio,
            direction: CallDirection::Incoming,
            status,
            timestamp: DateTime::from_millis(at).unwrap(),
        }
    }

    fn all() -> CallHistoryFilter {
        CallHistoryFilter {
            status: CallHistoryFilterStatus::All,
            conversation_ids: None,
        }
    }

    #[tokio::test]
    async fn test_adjacent_calls_are_grouped() {
        let store = MemoryCallHistory::new(vec![
            call("1", "alice", CallStatus::Missed, 10 * HOUR),
            call("2", "alice", CallStatus::Missed, 11 * HOUR),
            call("3", "alice", CallStatus::Missed, 20 * HOUR),
            call("4", "bob", CallStatus::Accepted, 12 * HOUR),
        ]);
        let groups = store
            .get_call_history_groups(&all(), CallHistoryPagination::new(0, 10))
            .await
            .unwrap();
        let children: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.children.iter().map(|c| c.call_id.as_str()).collect())
            .collect();
        assert_eq!(children, vec![vec!["3"], vec!["4"], vec!["2", "1"]]);
        assert_eq!(groups[2].timestamp.millis(), 11 * HOUR);
        assert_eq!(store.count_call_history_groups(&all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_filters_status_and_conversations() {
        let store = MemoryCallHistory::new(vec![
            call("1", "alice", CallStatus::Missed, HOUR),
            call("2", "bob", CallStatus::Missed, 2 * HOUR),
            call("3", "alice", CallStatus::Accepted, 3 * HOUR),
            call("4", "alice", CallStatus::Deleted, 4 * HOUR),
        ]);
        let missed_alice = CallHistoryFilter {
            status: CallHistoryFilterStatus::Missed,
            conversation_ids: Some(vec!["alice".to_string()]),
        };
        let groups = store
            .get_call_history_groups(&missed_alice, CallHistoryPagination::new(0, 10))
            .await
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].children[0].call_id, "1");
        // Deleted calls are never listed
        assert_eq!(store.count_call_history_groups(&all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_pagination() {
        let store = MemoryCallHistory::default();
        for i in 0..5 {
            store.add_call(call(&i.to_string(), &format!("peer{i}"), CallStatus::Accepted, i * HOUR));
        }
        let page = store
            .get_call_history_groups(&all(), CallHistoryPagination::new(3, 10))
            .await
            .unwrap();
        let peers: Vec<&str> = page.iter().map(|g| g.peer_id.as_str()).collect();
        assert_eq!(peers, vec!["peer1", "peer0"]);
    }
}
