//! Operational incidents and their lifecycle.

use crate::document::{Collection, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle: active -> dispatched -> on_scene -> resolved -> closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Active,
    Dispatched,
    OnScene,
    Resolved,
    Closed,
}

impl IncidentStatus {
    /// The single legal successor, if any
    pub fn next(&self) -> Option<IncidentStatus> {
        match self {
            Self::Active => Some(Self::Dispatched),
            Self::Dispatched => Some(Self::OnScene),
            Self::OnScene => Some(Self::Resolved),
            Self::Resolved => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Open incidents keep the owning station busy
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Dispatched | Self::OnScene)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dispatched => "dispatched",
            Self::OnScene => "on_scene",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "dispatched" => Ok(Self::Dispatched),
            "on_scene" => Ok(Self::OnScene),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown incident status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub alert_id: String,
    pub station_id: String,
    pub department_id: String,
    pub unit_id: String,
    #[serde(default)]
    pub status: IncidentStatus,
    /// Set while a referral of this incident is pending
    #[serde(default)]
    pub referred_to_station_id: Option<String>,
    #[serde(default)]
    pub dispatched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub on_scene_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    pub fn new(
        alert_id: impl Into<String>,
        station_id: impl Into<String>,
        department_id: impl Into<String>,
        unit_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::document::new_id(),
            alert_id: alert_id.into(),
            station_id: station_id.into(),
            department_id: department_id.into(),
            unit_id: unit_id.into(),
            status: IncidentStatus::Active,
            referred_to_station_id: None,
            dispatched_at: None,
            on_scene_at: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_pending_referral(&self) -> bool {
        self.referred_to_station_id.is_some()
    }

    /// Move to `status` and stamp the matching timestamp
    pub fn enter(&mut self, status: IncidentStatus, at: DateTime<Utc>) {
        self.status = status;
        match status {
            IncidentStatus::Active => {}
            IncidentStatus::Dispatched => self.dispatched_at = Some(at),
            IncidentStatus::OnScene => self.on_scene_at = Some(at),
            IncidentStatus::Resolved => self.resolved_at = Some(at),
            IncidentStatus::Closed => self.closed_at = Some(at),
        }
        self.updated_at = at;
    }
}

impl Document for Incident {
    const COLLECTION: Collection = Collection::Incidents;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
