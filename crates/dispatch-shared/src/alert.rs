//! Emergency alerts and their triage status.

use crate::document::{Collection, Document};
use crate::people::ReporterRef;
use crate::station::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Triage status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Awaiting triage at the owning station
    #[default]
    Active,
    /// Accepted; an incident exists
    Accepted,
    /// Declined by the owning station
    Rejected,
    /// Locked while a referral to another station is pending
    Referred,
}

impl AlertStatus {
    /// Accepted and rejected alerts never change status again
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    pub fn can_triage(&self) -> bool {
        *self == Self::Active
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Referred => "referred",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "referred" => Ok(Self::Referred),
            other => Err(format!("unknown alert status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub id: String,
    pub incident_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: GeoPoint,
    pub reporter: ReporterRef,
    /// Owning station
    pub station_id: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub decline_reason: Option<String>,
    #[serde(default)]
    pub referred_to_station_id: Option<String>,
    #[serde(default)]
    pub incident_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmergencyAlert {
    pub fn new(
        incident_type: impl Into<String>,
        location: GeoPoint,
        reporter: ReporterRef,
        station_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::document::new_id(),
            incident_type: incident_type.into(),
            description: None,
            location,
            reporter,
            station_id: station_id.into(),
            department_id: None,
            unit_id: None,
            status: AlertStatus::Active,
            decline_reason: None,
            referred_to_station_id: None,
            incident_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for EmergencyAlert {
    const COLLECTION: Collection = Collection::Alerts;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
