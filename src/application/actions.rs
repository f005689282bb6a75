//! Named shortcuts for frequently used Service Layer calls
use crate::model::requests::RequestSpec;
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// Preset calls runnable through [`SessionClient::run`](crate::application::client::SessionClient::run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedAction {
    /// Lists business partners with their code and type
    BusinessPartners,
}

impl NamedAction {
    /// Builds the request spec of the action
    pub fn spec(&self) -> RequestSpec {
        match self {
            NamedAction::BusinessPartners => RequestSpec::new(Method::GET, "BusinessPartners")
                .with_params([("$select", "CardCode,CardType")]),
        }
    }
}

impl fmt::Display for NamedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedAction::BusinessPartners => write!(f, "getBusinessPartners"),
        }
    }
}

impl FromStr for NamedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getBusinessPartners" | "business-partners" => Ok(NamedAction::BusinessPartners),
            other => Err(format!("unknown action: {other}")),
        }
    }
}
