//! Reporters: citizens and fire personnel.

use crate::document::{Collection, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterKind {
    Citizen,
    Personnel,
}

impl std::fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Citizen => write!(f, "citizen"),
            Self::Personnel => write!(f, "personnel"),
        }
    }
}

/// Reference from an alert to whoever raised it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterRef {
    pub kind: ReporterKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Citizen {
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            id: crate::document::new_id(),
            name: name.into(),
            phone,
            created_at: Utc::now(),
        }
    }
}

impl Document for Citizen {
    const COLLECTION: Collection = Collection::Citizens;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A member of a station's staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rank: Option<String>,
    pub station_id: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Personnel {
    pub fn new(name: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self {
            id: crate::document::new_id(),
            name: name.into(),
            rank: None,
            station_id: station_id.into(),
            phone: None,
            created_at: Utc::now(),
        }
    }
}

impl Document for Personnel {
    const COLLECTION: Collection = Collection::Personnel;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
