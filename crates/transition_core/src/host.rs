//! Capabilities the application shell provides to the controller.

use std::{future::Future, sync::Arc};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::{future::BoxFuture, FutureExt};
use shared::domain::RouteUrl;

/// Plain route change. May be called from inside a swap callback.
pub trait RouteNavigator: Send + Sync {
    fn navigate_to(&self, url: &RouteUrl);
}

/// Best-effort resource warm-up for a route.
#[async_trait]
pub trait RoutePrefetcher: Send + Sync {
    async fn prefetch(&self, url: &RouteUrl) -> Result<()>;
}

pub struct MissingPrefetcher;

#[async_trait]
impl RoutePrefetcher for MissingPrefetcher {
    async fn prefetch(&self, _url: &RouteUrl) -> Result<()> {
        Ok(())
    }
}

/// The "mutate the page now" callback handed to the animated-swap primitive.
/// The host must drive it to completion as part of the swap.
pub type ViewTransitionUpdate = BoxFuture<'static, ()>;

/// Handle to a running animated swap.
pub struct ViewTransition {
    /// Old and new visual states captured.
    pub ready: BoxFuture<'static, Result<()>>,
    /// Animation complete.
    pub finished: BoxFuture<'static, Result<()>>,
}

impl ViewTransition {
    pub fn new<R, F>(ready: R, finished: F) -> Self
    where
        R: Future<Output = Result<()>> + Send + 'static,
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            ready: ready.boxed(),
            finished: finished.boxed(),
        }
    }
}

pub trait ViewTransitionHost: Send + Sync {
    /// Checked on every navigation request, not cached.
    fn supports_view_transitions(&self) -> bool;
    fn start_view_transition(&self, update: ViewTransitionUpdate) -> Result<ViewTransition>;
}

pub struct MissingViewTransitions;

impl ViewTransitionHost for MissingViewTransitions {
    fn supports_view_transitions(&self) -> bool {
        false
    }

    fn start_view_transition(&self, _update: ViewTransitionUpdate) -> Result<ViewTransition> {
        Err(anyhow!("view transitions are unavailable"))
    }
}

/// Bundle of host capabilities owned by the controller.
#[derive(Clone)]
pub struct NavigationHost {
    pub navigator: Arc<dyn RouteNavigator>,
    pub prefetcher: Arc<dyn RoutePrefetcher>,
    pub view_transitions: Arc<dyn ViewTransitionHost>,
}

impl NavigationHost {
    pub fn new(navigator: Arc<dyn RouteNavigator>) -> Self {
        Self::new_with_dependencies(
            navigator,
            Arc::new(MissingPrefetcher),
            Arc::new(MissingViewTransitions),
        )
    }

    pub fn new_with_dependencies(
        navigator: Arc<dyn RouteNavigator>,
        prefetcher: Arc<dyn RoutePrefetcher>,
        view_transitions: Arc<dyn ViewTransitionHost>,
    ) -> Self {
        Self {
            navigator,
            prefetcher,
            view_transitions,
        }
    }

    pub fn with_prefetcher(mut self, prefetcher: Arc<dyn RoutePrefetcher>) -> Self {
        self.prefetcher = prefetcher;
        self
    }

    pub fn with_view_transitions(mut self, view_transitions: Arc<dyn ViewTransitionHost>) -> Self {
        self.view_transitions = view_transitions;
        self
    }
}
