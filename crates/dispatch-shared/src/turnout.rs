//! Turnout slip: the dispatch record frozen when a unit turns out.

use crate::document::{Collection, Document};
use crate::people::ReporterKind;
use crate::station::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id and display name of a referenced record at slip time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterSnapshot {
    pub kind: ReporterKind,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoutSlip {
    pub id: String,
    pub alert_id: String,
    pub incident_id: String,
    pub station: NamedRef,
    pub department: NamedRef,
    pub unit: NamedRef,
    pub incident_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: GeoPoint,
    pub reporter: ReporterSnapshot,
    pub reported_at: DateTime<Utc>,
    pub dispatched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Document for TurnoutSlip {
    const COLLECTION: Collection = Collection::TurnoutSlips;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
