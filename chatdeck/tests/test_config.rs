use chatdeck::config::{
    ConfigManager, DEFAULT_LEFT_PANE_WIDTH, DEFAULT_LOG_FILTER, MAX_LEFT_PANE_WIDTH,
    MIN_LEFT_PANE_WIDTH, Settings,
};

#[tokio::test]
async fn test_defaults_without_settings_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = ConfigManager::open(dir.path()).await.unwrap();
    let settings = config.settings().await;
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.preferred_left_pane_width, DEFAULT_LEFT_PANE_WIDTH);
    assert!(!config.path().exists());
}

#[tokio::test]
async fn test_changes_persist_across_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    {
        let config = ConfigManager::open(dir.path()).await.unwrap();
        config.set_region_code(Some("gb".to_string())).await.unwrap();
        assert!(config.toggle_nav_tabs_collapse().await.unwrap());
        assert_eq!(
            config.save_preferred_left_pane_width(5000).await.unwrap(),
            MAX_LEFT_PANE_WIDTH
        );
        config.set_locale("de".to_string()).await.unwrap();
    }
    let config = ConfigManager::open(dir.path()).await.unwrap();
    let settings = config.settings().await;
    assert_eq!(settings.region_code.as_deref(), Some("GB"));
    assert!(settings.nav_tabs_collapsed);
    assert_eq!(settings.preferred_left_pane_width, MAX_LEFT_PANE_WIDTH);
    assert_eq!(settings.locale, "de");

    assert!(!config.toggle_nav_tabs_collapse().await.unwrap());
    assert_eq!(
        config.save_preferred_left_pane_width(1).await.unwrap(),
        MIN_LEFT_PANE_WIDTH
    );
}

#[tokio::test]
async fn test_invalid_values_are_rejected() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = ConfigManager::open(dir.path()).await.unwrap();
    assert!(config.set_region_code(Some("USA".to_string())).await.is_err());
    assert!(config.set_region_code(Some("1A".to_string())).await.is_err());
    assert!(config.set_locale("  ".to_string()).await.is_err());
    assert_eq!(config.settings().await, Settings::default());
    config.set_region_code(None).await.unwrap();
}

#[tokio::test]
async fn test_partial_settings_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    tokio::fs::write(dir.path().join("settings.json"), r#"{ "regionCode": "DE" }"#)
        .await
        .unwrap();
    let config = ConfigManager::open(dir.path()).await.unwrap();
    let settings = config.settings().await;
    assert_eq!(settings.region_code.as_deref(), Some("DE"));
    assert_eq!(settings.locale, "en");

    tokio::fs::write(dir.path().join("settings.json"), "not json")
        .await
        .unwrap();
    assert!(ConfigManager::open(dir.path()).await.is_err());
}

#[test]
fn test_default_log_filter() {
    assert_eq!(DEFAULT_LOG_FILTER, "chatdeck=info");
    assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
}
