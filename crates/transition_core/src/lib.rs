pub mod controller;
pub mod host;
pub mod link;
pub mod routes;
pub mod timings;

pub use controller::NavigationTransitionController;
pub use host::{
    MissingPrefetcher, MissingViewTransitions, NavigationHost, RouteNavigator, RoutePrefetcher,
    ViewTransition, ViewTransitionHost, ViewTransitionUpdate,
};
pub use link::{NavigationBar, NavigationLinks, TransitionLink};
pub use routes::{AdjacentRoutes, ArticleEntry, InterviewCounter, RouteIndex};
pub use timings::{TimingSettings, TransitionTimings};
