use crate::models::{CallHistoryFilter, CallHistoryFilterOptions, ConversationSummary};
use crate::search::{ConversationSearch, normalize_query};

/// Builds the store query for the calls list.
///
/// Returns `None` when the search text matches no conversation: the caller
/// must then show zero calls instead of asking the store, since a filter
/// without conversations would match every call.
pub fn build_call_history_filter(
    search: &dyn ConversationSearch,
    conversations: &[ConversationSummary],
    region_code: Option<&str>,
    options: &CallHistoryFilterOptions,
) -> Option<CallHistoryFilter> {
    let query = normalize_query(&options.query);
    if query.is_empty() {
        return Some(CallHistoryFilter {
            status: options.status,
            conversation_ids: None,
        });
    }
    let current: Vec<&ConversationSummary> = conversations
        .iter()
        .filter(|conversation| !conversation.is_removed())
        .collect();
    let conversation_ids = search.search(&current, &query, region_code);
    if conversation_ids.is_empty() {
        return None;
    }
    Some(CallHistoryFilter {
        status: options.status,
        conversation_ids: Some(conversation_ids),
    })
}
