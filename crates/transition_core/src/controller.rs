use std::{
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use futures::{future, FutureExt};
use parking_lot::Mutex;
use shared::{
    domain::{NavigationRequest, RouteUrl, TransitionId, TransitionPhase},
    error::{ErrorCode, NavigationError},
    protocol::{SwapStage, TransitionEvent, TransitionOutcome},
};
use tokio::{
    runtime::Handle,
    sync::{broadcast, watch},
};
use tracing::{debug, info, warn};

use crate::{
    host::{NavigationHost, ViewTransition},
    timings::TransitionTimings,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct TransitionState {
    /// Attempt currently holding the transition lock.
    active: Option<TransitionId>,
    phase: TransitionPhase,
    /// Latest request seen while the lock was held. Depth is always 0 or 1.
    queued_url: Option<RouteUrl>,
    next_id: u64,
}

/// Guards the route change of one attempt so it is issued at most once,
/// whichever of the swap callback, the settle path or the safety guard gets
/// there first.
#[derive(Clone, Default)]
struct CommitLatch(Arc<AtomicBool>);

impl CommitLatch {
    fn claim(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

struct ControllerInner {
    host: NavigationHost,
    timings: TransitionTimings,
    runtime: Handle,
    state: Mutex<TransitionState>,
    loading: watch::Sender<bool>,
    events: broadcast::Sender<TransitionEvent>,
}

/// Serializes animated navigations: one swap at a time, a single
/// latest-wins pending destination, and a lock that is always released.
///
/// Cloning is cheap and every clone drives the same state, so the shell
/// creates one controller and hands clones to whatever triggers navigation.
#[derive(Clone)]
pub struct NavigationTransitionController {
    inner: Arc<ControllerInner>,
}

impl NavigationTransitionController {
    pub fn new(host: NavigationHost, timings: TransitionTimings) -> Result<Self, NavigationError> {
        let runtime = Handle::try_current().map_err(|_| NavigationError::NoRuntime)?;
        Ok(Self::with_runtime(host, timings, runtime))
    }

    pub fn with_runtime(host: NavigationHost, timings: TransitionTimings, runtime: Handle) -> Self {
        let (loading, _) = watch::channel(false);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(ControllerInner {
                host,
                timings,
                runtime,
                state: Mutex::new(TransitionState::default()),
                loading,
                events,
            }),
        }
    }

    /// Navigates to `target_url`, animated when the host supports it.
    ///
    /// Never fails and never blocks. A blank url is logged and dropped.
    pub fn request_navigation(&self, target_url: impl Into<String>) {
        match RouteUrl::parse(target_url) {
            Ok(url) => self.request(NavigationRequest::new(url)),
            Err(err) => warn!(%err, "navigation: ignoring request"),
        }
    }

    pub fn request(&self, request: NavigationRequest) {
        let url = request.target_url;
        let animated = self.inner.host.view_transitions.supports_view_transitions();

        let id = {
            let mut state = self.inner.state.lock();
            if state.active.is_some() {
                let replaced = state.queued_url.replace(url.clone());
                drop(state);
                debug!(
                    url = %url,
                    replaced = replaced.as_ref().map(RouteUrl::as_str),
                    "navigation: transition in flight; queued request"
                );
                self.spawn_prefetch(url.clone());
                self.emit(TransitionEvent::Queued { url, replaced });
                return;
            }

            if !animated {
                drop(state);
                info!(
                    url = %url,
                    code = ?ErrorCode::CapabilityAbsent,
                    "navigation: view transitions unsupported; plain route change"
                );
                self.inner.host.navigator.navigate_to(&url);
                self.emit(TransitionEvent::FallbackNavigation { url });
                return;
            }

            state.next_id += 1;
            let id = TransitionId(state.next_id);
            state.active = Some(id);
            state.phase = TransitionPhase::Preparing;
            self.inner.loading.send_replace(true);
            id
        };

        info!(transition_id = id.0, url = %url, "navigation: transition started");
        self.emit(TransitionEvent::Started {
            id,
            url: url.clone(),
        });

        let latch = CommitLatch::default();
        self.spawn_safety_guard(id, url.clone(), latch.clone());
        self.spawn_transition(id, url, latch);
    }

    /// Hints the host to warm `target_url`. Fire and forget.
    pub fn preload_route(&self, target_url: impl Into<String>) {
        match RouteUrl::parse(target_url) {
            Ok(url) => self.spawn_prefetch(url),
            Err(err) => debug!(%err, "navigation: ignoring preload"),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.state.lock().active.is_some()
    }

    pub fn queued_url(&self) -> Option<RouteUrl> {
        self.inner.state.lock().queued_url.clone()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.inner.state.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    /// Loading flag for UI consumers. Read-only by construction.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TransitionEvent> {
        self.inner.events.subscribe()
    }

    pub fn timings(&self) -> TransitionTimings {
        self.inner.timings
    }

    fn spawn_transition(&self, id: TransitionId, url: RouteUrl, latch: CommitLatch) {
        let controller = self.clone();
        self.inner.runtime.spawn(async move {
            let outcome = AssertUnwindSafe(controller.drive(id, url.clone(), latch.clone()))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| TransitionOutcome::SetupFailed {
                    reason: "transition task panicked".to_string(),
                });
            controller.settle(id, &url, &latch, outcome);
        });
    }

    async fn drive(&self, id: TransitionId, url: RouteUrl, latch: CommitLatch) -> TransitionOutcome {
        self.spawn_prefetch(url.clone());
        tokio::time::sleep(self.inner.timings.preload_settle).await;

        if !self.enter_phase(id, TransitionPhase::Animating) {
            return TransitionOutcome::SetupFailed {
                reason: "transition lock released before the swap started".to_string(),
            };
        }

        let update = {
            let controller = self.clone();
            let delay = self.inner.timings.commit_delay;
            async move {
                tokio::time::sleep(delay).await;
                controller.commit(id, &url, &latch);
            }
            .boxed()
        };

        let transition = match self.inner.host.view_transitions.start_view_transition(update) {
            Ok(transition) => transition,
            Err(err) => {
                return TransitionOutcome::SetupFailed {
                    reason: err.to_string(),
                }
            }
        };

        // Dropping the signal future on timeout discards whatever it resolves to later.
        tokio::time::timeout(
            self.inner.timings.animation_timeout,
            observe_swap(id, transition),
        )
        .await
        .unwrap_or(TransitionOutcome::Stalled)
    }

    fn settle(&self, id: TransitionId, url: &RouteUrl, latch: &CommitLatch, outcome: TransitionOutcome) {
        self.enter_phase(id, TransitionPhase::Settling);

        match outcome.failure() {
            None => info!(transition_id = id.0, url = %url, "navigation: transition finished"),
            Some(failure) => warn!(
                transition_id = id.0,
                url = %url,
                code = ?failure.code,
                reason = %failure.message,
                "navigation: transition degraded"
            ),
        }

        if self.commit(id, url, latch) {
            info!(
                transition_id = id.0,
                url = %url,
                "navigation: route change issued outside the swap callback"
            );
        }

        self.release(id);
        self.emit(TransitionEvent::Settled { id, outcome });
    }

    fn spawn_safety_guard(&self, id: TransitionId, url: RouteUrl, latch: CommitLatch) {
        let controller = self.clone();
        let deadline = self.inner.timings.lock_deadline();
        self.inner.runtime.spawn(async move {
            tokio::time::sleep(deadline).await;
            if !controller.holds_lock(id) {
                return;
            }

            warn!(
                transition_id = id.0,
                deadline = ?deadline,
                "navigation: transition lock still held; forcing release"
            );
            controller.commit(id, &url, &latch);
            if controller.release(id) {
                controller.emit(TransitionEvent::LockForceReleased { id });
            }
        });
    }

    fn commit(&self, id: TransitionId, url: &RouteUrl, latch: &CommitLatch) -> bool {
        if !latch.claim() {
            return false;
        }
        debug!(transition_id = id.0, url = %url, "navigation: committing route change");
        self.inner.host.navigator.navigate_to(url);
        self.emit(TransitionEvent::Committed {
            id,
            url: url.clone(),
        });
        true
    }

    /// Releases the lock if `id` still owns it, then drains the queue.
    fn release(&self, id: TransitionId) -> bool {
        let queued = {
            let mut state = self.inner.state.lock();
            if state.active != Some(id) {
                return false;
            }
            state.active = None;
            state.phase = TransitionPhase::Idle;
            self.inner.loading.send_replace(false);
            state.queued_url.take()
        };

        if let Some(url) = queued {
            self.spawn_queued_navigation(url);
        }
        true
    }

    fn spawn_queued_navigation(&self, url: RouteUrl) {
        let controller = self.clone();
        self.inner.runtime.spawn(async move {
            info!(url = %url, "navigation: servicing queued request");
            controller.inner.host.navigator.navigate_to(&url);
            controller.emit(TransitionEvent::QueuedNavigationCommitted { url });
        });
    }

    fn spawn_prefetch(&self, url: RouteUrl) {
        let prefetcher = Arc::clone(&self.inner.host.prefetcher);
        self.inner.runtime.spawn(async move {
            if let Err(err) = prefetcher.prefetch(&url).await {
                debug!(url = %url, error = %err, "navigation: prefetch failed");
            }
        });
    }

    fn enter_phase(&self, id: TransitionId, phase: TransitionPhase) -> bool {
        let mut state = self.inner.state.lock();
        if state.active != Some(id) {
            return false;
        }
        state.phase = phase;
        true
    }

    fn holds_lock(&self, id: TransitionId) -> bool {
        self.inner.state.lock().active == Some(id)
    }

    fn emit(&self, event: TransitionEvent) {
        let _ = self.inner.events.send(event);
    }
}

async fn observe_swap(id: TransitionId, transition: ViewTransition) -> TransitionOutcome {
    let ViewTransition { ready, finished } = transition;
    let ready = ready.map(|result| {
        match &result {
            Ok(()) => debug!(transition_id = id.0, "navigation: view transition ready"),
            Err(err) => warn!(transition_id = id.0, error = %err, "navigation: view transition ready failed"),
        }
        result
    });
    let finished = finished.map(|result| {
        match &result {
            Ok(()) => debug!(transition_id = id.0, "navigation: view transition finished"),
            Err(err) => warn!(transition_id = id.0, error = %err, "navigation: view transition finished with error"),
        }
        result
    });

    match future::join(ready, finished).await {
        (Err(err), _) => TransitionOutcome::Rejected {
            stage: SwapStage::Ready,
            reason: err.to_string(),
        },
        (Ok(()), Err(err)) => TransitionOutcome::Rejected {
            stage: SwapStage::Finished,
            reason: err.to_string(),
        },
        (Ok(()), Ok(())) => TransitionOutcome::Completed,
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
