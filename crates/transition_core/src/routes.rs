//! Ordered article routes and the prev/next/counter lookups the nav bar needs.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared::domain::RouteUrl;

pub const DEFAULT_ARTICLE_PREFIX: &str = "/interviews/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub slug: String,
    pub title: String,
}

impl ArticleEntry {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacentRoutes {
    pub prev: Option<RouteUrl>,
    pub next: Option<RouteUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewCounter {
    pub position: usize,
    pub total: usize,
    pub title: Option<String>,
}

impl fmt::Display for InterviewCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} interviews", self.position, self.total)?;
        if let Some(title) = &self.title {
            write!(f, " · {title}")?;
        }
        Ok(())
    }
}

/// Articles newest first, mounted under a path prefix.
#[derive(Debug, Clone)]
pub struct RouteIndex {
    prefix: String,
    articles: Vec<ArticleEntry>,
}

impl RouteIndex {
    pub fn new(articles: Vec<ArticleEntry>) -> Self {
        Self {
            prefix: DEFAULT_ARTICLE_PREFIX.to_string(),
            articles,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        self.prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn articles(&self) -> &[ArticleEntry] {
        &self.articles
    }

    pub fn route_for(&self, slug: &str) -> Option<RouteUrl> {
        RouteUrl::parse(format!("{}{slug}", self.prefix)).ok()
    }

    pub fn slug_for<'a>(&self, pathname: &'a str) -> Option<&'a str> {
        pathname.strip_prefix(self.prefix.as_str())
    }

    fn position_of(&self, pathname: &str) -> Option<usize> {
        let slug = self.slug_for(pathname)?;
        self.articles.iter().position(|article| article.slug == slug)
    }

    /// Previous and next article routes, wrapping at both ends. Off an
    /// article page, prev is the oldest article and next the second newest.
    pub fn adjacent(&self, pathname: &str) -> AdjacentRoutes {
        let len = self.articles.len();
        if len < 2 {
            return AdjacentRoutes::default();
        }

        let (prev, next) = match self.position_of(pathname) {
            None => (len - 1, 1),
            Some(index) => ((index + len - 1) % len, (index + 1) % len),
        };

        AdjacentRoutes {
            prev: self.route_for(&self.articles[prev].slug),
            next: self.route_for(&self.articles[next].slug),
        }
    }

    /// Counts down from the newest article. An unknown slug yields
    /// `total + 1` with no title.
    pub fn counter(&self, pathname: &str) -> InterviewCounter {
        let total = self.articles.len();
        let (index_one_based, current) = match self.slug_for(pathname) {
            None => (1, self.articles.first()),
            Some(slug) => match self.articles.iter().position(|article| article.slug == slug) {
                Some(index) => (index + 1, self.articles.get(index)),
                None => (0, None),
            },
        };

        InterviewCounter {
            position: total + 1 - index_one_based,
            total,
            title: current.map(|article| article.title.clone()),
        }
    }
}
