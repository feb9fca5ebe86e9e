//! Link-like controls wired to the shared navigation controller.

use shared::{
    domain::{NavigationRequest, RouteUrl},
    error::NavigationError,
};

use crate::{
    controller::NavigationTransitionController,
    routes::{InterviewCounter, RouteIndex},
};

/// A clickable route target. Clicks go through the transition controller,
/// hover and focus only warm the destination.
#[derive(Clone)]
pub struct TransitionLink {
    href: RouteUrl,
    label: String,
    controller: NavigationTransitionController,
}

impl TransitionLink {
    pub fn new(
        controller: NavigationTransitionController,
        href: RouteUrl,
        label: impl Into<String>,
    ) -> Self {
        Self {
            href,
            label: label.into(),
            controller,
        }
    }

    pub fn from_href(
        controller: NavigationTransitionController,
        href: &str,
        label: impl Into<String>,
    ) -> Result<Self, NavigationError> {
        Ok(Self::new(controller, RouteUrl::parse(href)?, label))
    }

    pub fn href(&self) -> &RouteUrl {
        &self.href
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn on_click(&self) {
        self.controller.request(NavigationRequest::new(self.href.clone()));
    }

    pub fn on_pointer_enter(&self) {
        self.controller.preload_route(self.href.as_str());
    }

    pub fn on_focus(&self) {
        self.controller.preload_route(self.href.as_str());
    }
}

/// Links rendered by the top navigation bar for one pathname.
pub struct NavigationLinks {
    pub home: TransitionLink,
    pub prev: Option<TransitionLink>,
    pub next: Option<TransitionLink>,
    pub counter: InterviewCounter,
}

pub struct NavigationBar {
    controller: NavigationTransitionController,
    index: RouteIndex,
    home: RouteUrl,
}

impl NavigationBar {
    pub fn new(controller: NavigationTransitionController, index: RouteIndex, home: RouteUrl) -> Self {
        Self {
            controller,
            index,
            home,
        }
    }

    pub fn index(&self) -> &RouteIndex {
        &self.index
    }

    pub fn links_for(&self, pathname: &str) -> NavigationLinks {
        let adjacent = self.index.adjacent(pathname);
        let link = |href: RouteUrl, label: &str| {
            TransitionLink::new(self.controller.clone(), href, label)
        };

        NavigationLinks {
            home: link(self.home.clone(), "Home"),
            prev: adjacent.prev.map(|href| link(href, "Prev")),
            next: adjacent.next.map(|href| link(href, "Next")),
            counter: self.index.counter(pathname),
        }
    }
}
