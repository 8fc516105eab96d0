//! Collections and the `Document` trait that binds a type to one.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Named document collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Stations,
    Departments,
    Units,
    Citizens,
    Personnel,
    Alerts,
    Incidents,
    Referrals,
    TurnoutSlips,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Stations,
        Collection::Departments,
        Collection::Units,
        Collection::Citizens,
        Collection::Personnel,
        Collection::Alerts,
        Collection::Incidents,
        Collection::Referrals,
        Collection::TurnoutSlips,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stations => "stations",
            Self::Departments => "departments",
            Self::Units => "units",
            Self::Citizens => "citizens",
            Self::Personnel => "personnel",
            Self::Alerts => "alerts",
            Self::Incidents => "incidents",
            Self::Referrals => "referrals",
            Self::TurnoutSlips => "turnout_slips",
        }
    }

    /// Singular entity name used in error messages
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Stations => "station",
            Self::Departments => "department",
            Self::Units => "unit",
            Self::Citizens => "citizen",
            Self::Personnel => "personnel",
            Self::Alerts => "alert",
            Self::Incidents => "incident",
            Self::Referrals => "referral",
            Self::TurnoutSlips => "turnout slip",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted record with a stable id
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Fresh document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
