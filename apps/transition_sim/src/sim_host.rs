//! In-process stand-in for a browser: route changes, prefetch and an
//! animated-swap primitive whose behaviour is picked by [`SwapMode`].

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::domain::RouteUrl;
use tokio::sync::oneshot;
use tracing::{debug, info};
use transition_core::{
    RouteNavigator, RoutePrefetcher, ViewTransition, ViewTransitionHost, ViewTransitionUpdate,
};

use crate::config::SwapMode;

const PREFETCH_LATENCY: Duration = Duration::from_millis(30);

pub struct SimulatedBrowser {
    mode: SwapMode,
    animation: Duration,
    visits: Mutex<Vec<RouteUrl>>,
}

impl SimulatedBrowser {
    pub fn new(mode: SwapMode, animation: Duration) -> Self {
        Self {
            mode,
            animation,
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn visits(&self) -> Vec<RouteUrl> {
        self.visits.lock().clone()
    }

    pub fn current_path(&self, home: &str) -> String {
        self.visits
            .lock()
            .last()
            .map(|url| url.to_string())
            .unwrap_or_else(|| home.to_string())
    }
}

impl RouteNavigator for SimulatedBrowser {
    fn navigate_to(&self, url: &RouteUrl) {
        info!(url = %url, "browser: route changed");
        self.visits.lock().push(url.clone());
    }
}

#[async_trait]
impl RoutePrefetcher for SimulatedBrowser {
    async fn prefetch(&self, url: &RouteUrl) -> Result<()> {
        tokio::time::sleep(PREFETCH_LATENCY).await;
        debug!(url = %url, "browser: prefetched route");
        Ok(())
    }
}

impl ViewTransitionHost for SimulatedBrowser {
    fn supports_view_transitions(&self) -> bool {
        self.mode != SwapMode::Unsupported
    }

    fn start_view_transition(&self, update: ViewTransitionUpdate) -> Result<ViewTransition> {
        if self.mode == SwapMode::FailToStart {
            bail!("startViewTransition is not callable in this document");
        }

        let (ready_tx, ready_rx) = oneshot::channel::<()>();
        let (finished_tx, finished_rx) = oneshot::channel::<()>();
        let animation = self.animation;
        tokio::spawn(async move {
            update.await;
            let _ = ready_tx.send(());
            tokio::time::sleep(animation).await;
            let _ = finished_tx.send(());
        });

        let mode = self.mode;
        let ready = async move {
            ready_rx.await.map_err(|_| anyhow!("ready signal dropped"))?;
            if mode == SwapMode::RejectReady {
                bail!("InvalidStateError: view transition was skipped");
            }
            Ok::<(), anyhow::Error>(())
        };
        let finished = async move {
            if mode == SwapMode::Stall {
                std::future::pending::<()>().await;
            }
            finished_rx.await.map_err(|_| anyhow!("finished signal dropped"))?;
            if mode == SwapMode::RejectFinished {
                bail!("AbortError: view transition aborted");
            }
            Ok::<(), anyhow::Error>(())
        };

        Ok(ViewTransition::new(ready, finished))
    }
}
