use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod bookmark;
pub mod comment;
pub mod login;
pub mod push;
pub mod report;
pub mod reports;
pub mod view;

use crate::bookmark::{BookmarkStore, JsonFileBookmarks};
use crate::citycare::{ApiReportMapper, CityCareApi, HttpCityCareApi, ReportMapper};
use crate::core::AppConfig;
use crate::device::TerminalPrompt;
use crate::maptiler::{Geocoder, MapTilerGeocoder};
use crate::pages::ReportDetailPresenter;
use view::TerminalView;

#[derive(Subcommand)]
enum Command {
    /// List every report
    Reports {},
    /// Show a report with its comments
    Report {
        #[arg(long)]
        id: String,
        /// Also ask the server to push this report to this device
        #[arg(long, action, default_value = "false")]
        notify_me: bool,
    },
    /// Comment on a report
    Comment {
        #[arg(long)]
        id: String,
        #[arg(long)]
        body: String,
    },
    /// Push a report to this device
    NotifyMe {
        #[arg(long)]
        id: String,
    },
    /// Save a report for later
    Save {
        #[arg(long)]
        id: String,
    },
    /// Remove a saved report
    Unsave {
        #[arg(long)]
        id: String,
    },
    /// List saved reports
    Saved {},
    /// Subscribe this device to push notifications
    Subscribe {},
    /// Unsubscribe this device from push notifications
    Unsubscribe {},
    /// Log in and remember the access token, the password is prompted for
    Login {
        #[arg(long)]
        email: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub(crate) fn api(config: &AppConfig) -> Arc<dyn CityCareApi> {
    Arc::new(HttpCityCareApi::new(
        &config.api_base_url,
        config.access_token.as_deref(),
    ))
}

pub(crate) fn mapper(config: &AppConfig) -> Arc<dyn ReportMapper> {
    let geocoder = config
        .map_service_api_key
        .as_deref()
        .map(|key| Arc::new(MapTilerGeocoder::new(key)) as Arc<dyn Geocoder>);
    Arc::new(ApiReportMapper::new(geocoder))
}

pub(crate) fn bookmarks(config: &AppConfig) -> Arc<dyn BookmarkStore> {
    Arc::new(JsonFileBookmarks::new(config.bookmarks_path()))
}

pub(crate) fn report_detail_presenter(config: &AppConfig, id: &str) -> ReportDetailPresenter {
    ReportDetailPresenter::new(
        id,
        Arc::new(TerminalView::for_report(id)),
        api(config),
        mapper(config),
        bookmarks(config),
    )
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Reports {}) => {
            reports::run(&config).await;
        }
        Some(Command::Report { id, notify_me }) => {
            report::run(&config, &id, notify_me).await;
        }
        Some(Command::Comment { id, body }) => {
            comment::run(&config, &id, body).await;
        }
        Some(Command::NotifyMe { id }) => {
            report::notify_me(&config, &id).await;
        }
        Some(Command::Save { id }) => {
            bookmark::save(&config, &id).await;
        }
        Some(Command::Unsave { id }) => {
            bookmark::unsave(&config, &id).await;
        }
        Some(Command::Saved {}) => {
            bookmark::list(&config).await?;
        }
        Some(Command::Subscribe {}) => {
            push::subscribe(&config).await;
        }
        Some(Command::Unsubscribe {}) => {
            push::unsubscribe(&config).await;
        }
        Some(Command::Login { email }) => {
            login::run(&config, email, Arc::new(TerminalPrompt)).await?;
        }
        None => {}
    }

    Ok(())
}
