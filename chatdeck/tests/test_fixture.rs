use std::path::PathBuf;
use std::sync::Arc;

use chatdeck::calls::{CallsTab, MemoryCallHistory, call_history_row};
use chatdeck::fixture::Fixture;
use chatdeck::i18n::Catalog;
use chatdeck::models::{
    CallExternalState, CallHistoryFilterOptions, CallHistoryFilterStatus, CallHistoryPagination,
    CallingIcon,
};
use chatdeck::search::RecentConversationSearch;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/calls.json")
}

async fn load_tab() -> (Fixture, CallsTab) {
    let fixture = Fixture::load(&fixture_path()).await.expect("failed to load fixture");
    let store = Arc::new(MemoryCallHistory::new(fixture.calls.clone()));
    let tab = CallsTab::new(store, Arc::new(RecentConversationSearch::new()));
    tab.set_conversations(fixture.conversations.clone());
    tab.set_region_code(Some("US".to_string()));
    (fixture, tab)
}

/// (title, text, icon, call count) of every row for `query`.
async fn rows(query: &str) -> Vec<(String, String, CallingIcon, usize)> {
    let (fixture, tab) = load_tab().await;
    let options = CallHistoryFilterOptions::new(query, CallHistoryFilterStatus::All);
    let groups = tab
        .get_call_history_groups(&options, CallHistoryPagination::new(0, 50))
        .await
        .unwrap();
    let groups = tab.accept(groups).unwrap();
    groups
        .iter()
        .map(|group| {
            let row = call_history_row(
                group,
                fixture.conversation(&group.peer_id),
                None,
                CallExternalState::Ended,
                Catalog::english(),
            )
            .unwrap();
            (row.title, row.text, row.icon, row.call_count)
        })
        .collect()
}

#[tokio::test]
async fn test_fixture_loads() {
    let fixture = Fixture::load(&fixture_path()).await.unwrap();
    assert_eq!(fixture.conversations.len(), 6);
    assert_eq!(fixture.calls.len(), 6);
    assert!(fixture.conversation("old").unwrap().is_removed());
    assert!(!fixture.conversation("unknown").unwrap().title_no_default);
    assert_eq!(fixture.call("c4").unwrap().ringer_id.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_all_calls() {
    let rows = rows("").await;
    assert_eq!(
        rows,
        vec![
            (
                "Alina Old".to_string(),
                "Accepted incoming audio call".to_string(),
                CallingIcon::AudioIncoming,
                1
            ),
            ("Book Club".to_string(), "Call ended".to_string(), CallingIcon::Video, 1),
            (
                "Bob Stone".to_string(),
                "Missed or declined outgoing video call".to_string(),
                CallingIcon::VideoMissed,
                1
            ),
            (
                "Alice Liddell".to_string(),
                "Missed incoming audio call".to_string(),
                CallingIcon::AudioMissed,
                2
            ),
        ]
    );
}

#[tokio::test]
async fn test_search_by_system_name_and_phone() {
    let by_name = rows("bobby").await;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].0, "Bob Stone");

    let by_phone = rows("(555) 123-0001").await;
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].0, "Alice Liddell");

    // The removed conversation's calls are hidden from searches
    assert!(rows("alina").await.is_empty());
}

#[tokio::test]
async fn test_active_group_call_names_creator() {
    let (fixture, tab) = load_tab().await;
    let options = CallHistoryFilterOptions::new("book", CallHistoryFilterStatus::All);
    let groups = tab
        .get_call_history_groups(&options, CallHistoryPagination::new(0, 10))
        .await
        .unwrap()
        .value;
    assert_eq!(groups.len(), 1);
    let creator = fixture.conversation("bob");
    let row = call_history_row(
        &groups[0],
        fixture.conversation("book-club"),
        creator,
        CallExternalState::Active,
        Catalog::english(),
    )
    .unwrap();
    assert_eq!(row.text, "Bobby started a group call");
    assert_eq!(row.icon, CallingIcon::Video);
}
