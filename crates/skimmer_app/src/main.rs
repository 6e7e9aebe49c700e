//! Skimmer: marks forum reply backlogs as read and warms low-engagement
//! topics with background visits.

mod app;
mod effects;
mod logging;
mod persistence;
mod watch;

use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::{Parser, Subcommand};
use skimmer_core::{topic_position, Msg, SpeedProfile, Status};
use skimmer_engine::{ClientSettings, EngagementWindow};

use crate::app::{App, AppConfig};
use crate::effects::BrowseOptions;
use crate::logging::LogDestination;

#[derive(Parser)]
#[command(name = "skimmer", about = "Forum quick-read assistant")]
struct Cli {
    /// Forum base URL.
    #[arg(long, default_value = "https://linux.do")]
    base_url: String,

    /// Session cookie value; falls back to the SKIMMER_COOKIE variable.
    #[arg(long)]
    cookie: Option<String>,

    /// Log to ./skimmer.log instead of the terminal.
    #[arg(long)]
    log_file: bool,

    /// Enable debug-level logging.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a topic's unread replies as read.
    Mark {
        /// Topic URL, e.g. https://linux.do/t/topic/123/4
        topic_url: String,

        /// Speed profile: normal, fast, turbo or crazy.
        #[arg(long)]
        speed: Option<String>,
    },
    /// Discover low-engagement topics and visit them in the background.
    Browse {
        /// Number of topics to visit.
        #[arg(long)]
        count: Option<u8>,

        /// Concurrent visits, 1 to 10.
        #[arg(long)]
        concurrency: Option<u8>,

        /// Speed profile to persist for later mark runs.
        #[arg(long)]
        speed: Option<String>,

        /// Seconds to dwell on each visited topic.
        #[arg(long, default_value_t = 3)]
        dwell_secs: u64,

        /// Listing pages to walk at most.
        #[arg(long, default_value_t = 10)]
        max_pages: u32,

        /// Admit topics with at most this many views.
        #[arg(long, default_value_t = 500)]
        max_views: u32,

        /// Admit topics with at most this many replies.
        #[arg(long, default_value_t = 10)]
        max_replies: u32,
    },
    /// Follow URLs from stdin, marking each topic as it is entered.
    Watch {
        /// Speed profile: normal, fast, turbo or crazy.
        #[arg(long)]
        speed: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::initialize(
        if cli.log_file {
            LogDestination::File
        } else {
            LogDestination::Terminal
        },
        cli.verbose,
    );

    let cookie = cli
        .cookie
        .or_else(|| std::env::var("SKIMMER_COOKIE").ok());
    let client_settings = ClientSettings {
        base_url: cli.base_url,
        session_cookie: cookie,
        ..ClientSettings::default()
    };

    match cli.command {
        Command::Mark { topic_url, speed } => {
            if topic_position(&topic_url).is_none() {
                anyhow::bail!("not a topic url: {topic_url}");
            }
            let config = AppConfig {
                client_settings,
                browse: BrowseOptions::default(),
            };
            let mut app = App::new(config)?;
            apply_speed(&mut app, speed)?;
            app.apply(Msg::UrlChanged(topic_url));
            app.run_until(|state| {
                matches!(
                    state.status(),
                    Status::NothingToMark
                        | Status::MarkFinished { .. }
                        | Status::MarkStopped { .. }
                        | Status::InspectFailed
                )
            })
        }
        Command::Browse {
            count,
            concurrency,
            speed,
            dwell_secs,
            max_pages,
            max_views,
            max_replies,
        } => {
            let config = AppConfig {
                client_settings,
                browse: BrowseOptions {
                    window: EngagementWindow {
                        max_views,
                        max_replies,
                    },
                    dwell: Duration::from_secs(dwell_secs),
                    max_pages,
                },
            };
            let mut app = App::new(config)?;
            apply_speed(&mut app, speed)?;
            if let Some(count) = count {
                app.apply(Msg::VisitTargetChanged(count));
            }
            if let Some(concurrency) = concurrency {
                app.apply(Msg::ConcurrencyChanged(concurrency));
            }
            app.apply(Msg::BrowseRequested);
            app.run_until(|state| {
                matches!(
                    state.status(),
                    Status::VisitFinished { .. }
                        | Status::VisitStopped { .. }
                        | Status::DiscoveryFailed
                )
            })
        }
        Command::Watch { speed } => {
            let config = AppConfig {
                client_settings,
                browse: BrowseOptions::default(),
            };
            let mut app = App::new(config)?;
            apply_speed(&mut app, speed)?;
            let eof = watch::spawn(app.sender());
            app.run_until(|state| {
                eof.load(Ordering::SeqCst) && !state.is_marking() && !state.is_visiting()
            })
        }
    }
}

fn apply_speed(app: &mut App, speed: Option<String>) -> anyhow::Result<()> {
    if let Some(key) = speed {
        let profile = SpeedProfile::from_key(&key)
            .ok_or_else(|| anyhow::anyhow!("unknown speed profile: {key}"))?;
        app.apply(Msg::SpeedSelected(profile));
    }
    Ok(())
}
