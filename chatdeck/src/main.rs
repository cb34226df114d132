use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use chatdeck::calls::{CallsTab, MemoryCallHistory, call_history_row};
use chatdeck::config::{ConfigManager, DEFAULT_LOG_FILTER};
use chatdeck::fixture::Fixture;
use chatdeck::i18n::{Catalog, Localizer};
use chatdeck::models::{
    CallExternalState, CallHistoryFilterOptions, CallHistoryFilterStatus, CallHistoryGroup,
    CallHistoryPagination, CallMode, ConversationSummary,
};
use chatdeck::search::RecentConversationSearch;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "chatdeck", version, about = "Chats and calls tab tooling")]
struct Cli {
    /// Profile directory holding settings.json
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List call history from a fixture the way the calls tab shows it
    Calls {
        /// JSON file with `conversations` and `calls`
        #[arg(long)]
        fixture: PathBuf,
        /// Conversation search text
        #[arg(long, default_value = "")]
        query: String,
        /// Only show missed calls
        #[arg(long)]
        missed: bool,
        /// Region code overriding the configured one
        #[arg(long)]
        region: Option<String>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Message catalog overriding the built-in English one
        #[arg(long)]
        messages: Option<PathBuf>,
    },
    /// Show or change settings
    Config {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        toggle_nav_tabs: bool,
        #[arg(long)]
        left_pane_width: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing (optional, controlled via RUST_LOG)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let profile_dir = match cli.profile_dir {
        Some(dir) => dir,
        None => ConfigManager::default_dir()?,
    };
    let config = ConfigManager::open(&profile_dir).await?;

    match cli.command {
        Command::Calls {
            fixture,
            query,
            missed,
            region,
            offset,
            limit,
            messages,
        } => {
            let fixture = Fixture::load(&fixture).await?;
            let catalog = match messages {
                Some(path) => Catalog::load(&path).await?,
                None => Catalog::english().clone(),
            };
            let region = region.or(config.settings().await.region_code);
            let status = if missed {
                CallHistoryFilterStatus::Missed
            } else {
                CallHistoryFilterStatus::All
            };
            let options = CallHistoryFilterOptions::new(query, status);
            let pagination = CallHistoryPagination::new(offset, limit);
            list_calls(&fixture, region, &options, pagination, &catalog).await
        }
        Command::Config {
            region,
            locale,
            toggle_nav_tabs,
            left_pane_width,
        } => {
            if let Some(region) = region {
                config.set_region_code(Some(region)).await?;
            }
            if let Some(locale) = locale {
                config.set_locale(locale).await?;
            }
            if toggle_nav_tabs {
                config.toggle_nav_tabs_collapse().await?;
            }
            if let Some(width) = left_pane_width {
                config.save_preferred_left_pane_width(width).await?;
            }
            let settings = config.settings().await;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn list_calls(
    fixture: &Fixture,
    region: Option<String>,
    options: &CallHistoryFilterOptions,
    pagination: CallHistoryPagination,
    i18n: &dyn Localizer,
) -> Result<(), anyhow::Error> {
    let store = Arc::new(MemoryCallHistory::new(fixture.calls.clone()));
    let tab = CallsTab::new(store, Arc::new(RecentConversationSearch::new()));
    tab.set_conversations(fixture.conversations.clone());
    tab.set_region_code(region);

    let count = tab.get_call_history_groups_count(options).await?;
    let groups = tab.get_call_history_groups(options, pagination).await?;
    let count = tab.accept(count).context("Call history changed while counting")?;
    let groups = tab.accept(groups).context("Call history changed while loading")?;

    println!("{count} call(s)");
    for group in &groups {
        let peer = fixture.conversation(&group.peer_id);
        let creator = group_call_creator(fixture, group);
        // Without live call state every group call is shown as ended.
        let external_state = CallExternalState::Ended;
        let row = call_history_row(group, peer, creator, external_state, i18n)?;
        let when = row.timestamp.0.format("%Y-%m-%d %H:%M");
        let repeat = if row.call_count > 1 {
            format!(" ({})", row.call_count)
        } else {
            String::new()
        };
        println!("{when}  {:<15} {}{repeat}  {}", row.icon, row.title, row.text);
    }
    Ok(())
}

fn group_call_creator<'a>(
    fixture: &'a Fixture,
    group: &CallHistoryGroup,
) -> Option<&'a ConversationSummary> {
    if group.mode != CallMode::Group {
        return None;
    }
    let newest = group.children.first()?;
    let ringer_id = fixture.call(&newest.call_id)?.ringer_id.as_deref()?;
    fixture.conversation(ringer_id)
}
