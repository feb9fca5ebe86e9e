use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(TransitionId);

/// Opaque route identifier. The only rule is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteUrl(String);

impl RouteUrl {
    pub fn parse(raw: impl Into<String>) -> Result<Self, RouteError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteUrl {
    type Error = RouteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for RouteUrl {
    type Error = RouteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RouteUrl> for String {
    fn from(value: RouteUrl) -> Self {
        value.0
    }
}

impl AsRef<str> for RouteUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub target_url: RouteUrl,
}

impl NavigationRequest {
    pub fn new(target_url: RouteUrl) -> Self {
        Self { target_url }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    Preparing,
    Animating,
    Settling,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_route_urls() {
        assert_eq!(RouteUrl::parse(""), Err(RouteError::Empty));
        assert_eq!(RouteUrl::parse("   "), Err(RouteError::Empty));
    }

    #[test]
    fn keeps_route_url_verbatim() {
        let url = RouteUrl::parse("/interviews/sean-kenary?ref=nav").expect("url");
        assert_eq!(url.as_str(), "/interviews/sean-kenary?ref=nav");
    }

    #[test]
    fn route_url_deserialization_enforces_non_empty() {
        let parsed: Result<RouteUrl, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: RouteUrl = serde_json::from_str("\"/\"").expect("root");
        assert_eq!(parsed.as_str(), "/");
    }
}
