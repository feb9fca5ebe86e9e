use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shared::{domain::RouteUrl, protocol::TransitionEvent};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use transition_core::{
    NavigationBar, NavigationHost, NavigationTransitionController, RouteIndex, TransitionLink,
    TransitionTimings,
};

mod config;
mod sim_host;

use config::{load_settings, SwapMode};
use sim_host::SimulatedBrowser;

/// Slack after the loading flag clears so a queued navigation can land.
const DRAIN_GRACE: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "transition.toml")]
    config: PathBuf,
    #[arg(long, value_enum)]
    swap: Option<SwapMode>,
    #[arg(long)]
    animation_ms: Option<u64>,
    /// Print lifecycle events as JSON lines.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fire navigation requests with a fixed gap between them.
    Burst {
        #[arg(long, default_value_t = 0)]
        gap_ms: u64,
        /// Issue a preload hint before each request, like a hover would.
        #[arg(long)]
        hover: bool,
        urls: Vec<String>,
    },
    /// Click through the nav bar, waiting for each transition to settle.
    Browse {
        #[arg(value_enum)]
        steps: Vec<Step>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Step {
    Home,
    Prev,
    Next,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(swap) = cli.swap {
        settings.swap = swap;
    }
    if let Some(animation_ms) = cli.animation_ms {
        settings.animation_ms = animation_ms;
    }

    let browser = Arc::new(SimulatedBrowser::new(
        settings.swap,
        Duration::from_millis(settings.animation_ms),
    ));
    let host = NavigationHost::new_with_dependencies(browser.clone(), browser.clone(), browser.clone());
    let timings = TransitionTimings::from(settings.timings);
    let controller = NavigationTransitionController::new(host, timings)?;
    info!(swap = ?settings.swap, ?timings, "sim: controller ready");

    let printer = spawn_event_printer(controller.subscribe_events(), cli.json);

    match cli.command {
        Command::Burst {
            gap_ms,
            hover,
            urls,
        } => {
            if urls.is_empty() {
                bail!("burst needs at least one url");
            }
            let count = urls.len();
            for (i, url) in urls.into_iter().enumerate() {
                if hover {
                    controller.preload_route(url.as_str());
                }
                controller.request_navigation(url);
                if gap_ms > 0 && i + 1 < count {
                    tokio::time::sleep(Duration::from_millis(gap_ms)).await;
                }
            }
            wait_until_idle(&controller).await;
        }
        Command::Browse { steps } => {
            let index = RouteIndex::new(settings.articles.clone()).with_prefix(&settings.article_prefix);
            let bar = NavigationBar::new(controller.clone(), index, RouteUrl::parse(settings.home.as_str())?);

            for step in steps {
                let pathname = browser.current_path(&settings.home);
                let links = bar.links_for(&pathname);
                println!("{pathname}: {}", links.counter);

                let target: Option<TransitionLink> = match step {
                    Step::Home => Some(links.home),
                    Step::Prev => links.prev,
                    Step::Next => links.next,
                };
                let Some(link) = target else {
                    warn!(?step, %pathname, "sim: link disabled on this page");
                    continue;
                };

                link.on_pointer_enter();
                link.on_click();
                wait_until_idle(&controller).await;
            }

            let pathname = browser.current_path(&settings.home);
            println!("{pathname}: {}", bar.links_for(&pathname).counter);
        }
    }

    printer.abort();

    let visits = browser.visits();
    println!("route changes ({}):", visits.len());
    for url in visits {
        println!("  {url}");
    }

    Ok(())
}

async fn wait_until_idle(controller: &NavigationTransitionController) {
    let timings = controller.timings();
    let bound = timings.preload_settle + timings.lock_deadline();
    let mut loading = controller.subscribe_loading();
    if tokio::time::timeout(bound, loading.wait_for(|is_loading| !*is_loading))
        .await
        .is_err()
    {
        warn!(?bound, "sim: controller still loading past its deadline");
    }
    tokio::time::sleep(DRAIN_GRACE).await;
}

fn spawn_event_printer(
    mut events: broadcast::Receiver<TransitionEvent>,
    json: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) if json => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(error) => warn!(%error, "sim: failed to encode event"),
                },
                Ok(event) => println!("{event:?}"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "sim: event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
