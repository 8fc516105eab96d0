//! Stations and their organisational tree (departments, units).

use crate::document::{Collection, Document};
use crate::error::{DispatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the department that owns newly accepted alerts
pub const OPERATIONS_DEPARTMENT: &str = "Operations";

/// Whether a station can take on work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    #[default]
    Commissioned,
    Decommissioned,
    UnderMaintenance,
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commissioned => write!(f, "commissioned"),
            Self::Decommissioned => write!(f, "decommissioned"),
            Self::UnderMaintenance => write!(f, "under_maintenance"),
        }
    }
}

/// A named point on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DispatchError::validation("location name is required"));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DispatchError::validation(format!(
                "latitude {} is out of range",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DispatchError::validation(format!(
                "longitude {} is out of range",
                self.longitude
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub commission_status: CommissionStatus,
    /// Aggregate: the station owns an active alert or is the target of a pending alert referral
    #[serde(default)]
    pub has_active_alert: bool,
    /// Aggregate: the station owns an open incident or is the target of a pending incident referral
    #[serde(default)]
    pub has_active_incident: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: crate::document::new_id(),
            name: name.into(),
            location: None,
            phone: None,
            region: None,
            commission_status: CommissionStatus::Commissioned,
            has_active_alert: false,
            has_active_incident: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_commissioned(&self) -> bool {
        self.commission_status == CommissionStatus::Commissioned
    }

    pub fn flags(&self) -> StationFlags {
        StationFlags {
            station_id: self.id.clone(),
            has_active_alert: self.has_active_alert,
            has_active_incident: self.has_active_incident,
        }
    }

    /// Case-insensitive name comparison used for station lookups
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl Document for Station {
    const COLLECTION: Collection = Collection::Stations;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Snapshot of a station's aggregate flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationFlags {
    pub station_id: String,
    pub has_active_alert: bool,
    pub has_active_incident: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub station_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(station_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: crate::document::new_id(),
            station_id: station_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_operations(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(OPERATIONS_DEPARTMENT)
    }
}

impl Document for Department {
    const COLLECTION: Collection = Collection::Departments;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A crew or appliance inside a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub department_id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Unit {
    pub fn new(department_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: crate::document::new_id(),
            department_id: department_id.into(),
            name: name.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl Document for Unit {
    const COLLECTION: Collection = Collection::Units;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_match_ignores_case_and_padding() {
        assert!(Department::new("s", " operations ").is_operations());
        assert!(Department::new("s", "OPERATIONS").is_operations());
        assert!(!Department::new("s", "Operations Support").is_operations());
    }

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new("Harbour", 5.6, -0.2).validate().is_ok());
        assert!(GeoPoint::new("Harbour", 91.0, 0.0).validate().is_err());
        assert!(GeoPoint::new("Harbour", 0.0, -181.0).validate().is_err());
        assert!(GeoPoint::new("Harbour", f64::NAN, 0.0).validate().is_err());
        assert!(GeoPoint::new("  ", 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_new_station_is_idle_and_commissioned() {
        let station = Station::new("Central");
        assert!(station.is_commissioned());
        assert!(!station.has_active_alert && !station.has_active_incident);
        assert!(station.name_matches(" central "));
    }

    #[test]
    fn test_unit_defaults_active_when_missing() {
        let json = r#"{"id":"u1","department_id":"d1","name":"Engine 1","created_at":"2024-01-01T00:00:00Z"}"#;
        let unit: Unit = serde_json::from_str(json).unwrap();
        assert!(unit.is_active);
    }
}
