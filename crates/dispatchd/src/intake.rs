//! Alert intake: validate a report, resolve who raised it and which
//! station owns it, then persist and announce.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    Citizen, DispatchError, DispatchEvent, EmergencyAlert, GeoPoint, Personnel, ReporterKind,
    ReporterRef, Result, Station,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlertRequest {
    pub incident_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: GeoPoint,
    pub reporter_id: String,
    /// When absent the citizen registry is tried first, then personnel
    #[serde(default)]
    pub reporter_kind: Option<ReporterKind>,
    #[serde(default)]
    pub station_id: Option<String>,
    /// Looked up case-insensitively; an unknown name registers a new station
    #[serde(default)]
    pub station_name: Option<String>,
}

impl NewAlertRequest {
    pub fn validate(&self) -> Result<()> {
        if self.incident_type.trim().is_empty() {
            return Err(DispatchError::validation("incident_type is required"));
        }
        self.location.validate()?;
        if self.reporter_id.trim().is_empty() {
            return Err(DispatchError::validation("reporter_id is required"));
        }
        let has_station_id = self.station_id.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_station_name = self
            .station_name
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if !has_station_id && !has_station_name {
            return Err(DispatchError::validation(
                "station_id or station_name is required",
            ));
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl Dispatcher {
    pub fn submit_alert(&self, req: NewAlertRequest) -> Result<EmergencyAlert> {
        req.validate()?;
        let _gate = self.gate();

        let reporter = self.resolve_reporter(req.reporter_id.trim(), req.reporter_kind)?;
        let station = self.resolve_station(
            non_empty(req.station_id.as_deref()),
            non_empty(req.station_name.as_deref()),
        )?;
        if !station.is_commissioned() {
            warn!("Rejected alert for {} station {}", station.commission_status, station.name);
            return Err(DispatchError::unavailable(
                &station.id,
                format!("station is {}", station.commission_status),
            ));
        }

        let mut alert = EmergencyAlert::new(
            req.incident_type.trim(),
            req.location,
            reporter,
            &station.id,
        );
        alert.description = req.description.filter(|d| !d.trim().is_empty());
        if let Some(assignment) = self.find_operations_unit(&station.id)? {
            alert.department_id = Some(assignment.department.id);
            alert.unit_id = Some(assignment.unit.id);
        }

        self.store.put(&alert)?;
        info!(
            "Alert {} ({}) received for station {}",
            alert.id, alert.incident_type, station.name
        );

        self.refresh_station_flags(&station.id)?;
        self.emit(DispatchEvent::AlertCreated(alert.clone()));
        Ok(alert)
    }

    pub(crate) fn resolve_reporter(
        &self,
        reporter_id: &str,
        kind: Option<ReporterKind>,
    ) -> Result<ReporterRef> {
        let citizen = || self.store.get::<Citizen>(reporter_id).map(|c| c.is_some());
        let personnel = || self.store.get::<Personnel>(reporter_id).map(|p| p.is_some());

        let resolved = match kind {
            Some(ReporterKind::Citizen) => citizen()?.then_some(ReporterKind::Citizen),
            Some(ReporterKind::Personnel) => personnel()?.then_some(ReporterKind::Personnel),
            None => {
                if citizen()? {
                    Some(ReporterKind::Citizen)
                } else if personnel()? {
                    Some(ReporterKind::Personnel)
                } else {
                    None
                }
            }
        };

        match resolved {
            Some(kind) => Ok(ReporterRef {
                kind,
                id: reporter_id.to_string(),
            }),
            None => Err(DispatchError::not_found(
                kind.map(|k| match k {
                    ReporterKind::Citizen => "citizen",
                    ReporterKind::Personnel => "personnel",
                })
                .unwrap_or("reporter"),
                reporter_id,
            )),
        }
    }

    /// By id (must exist), else by name, registering unknown names
    pub(crate) fn resolve_station(
        &self,
        station_id: Option<&str>,
        station_name: Option<&str>,
    ) -> Result<Station> {
        if let Some(id) = station_id {
            return self.store.require::<Station>(id);
        }
        let name = station_name
            .ok_or_else(|| DispatchError::validation("station_id or station_name is required"))?;

        if let Some(existing) = self.store.find_first(|s: &Station| s.name_matches(name))? {
            return Ok(existing);
        }

        let station = Station::new(name);
        self.store.put(&station)?;
        info!("Registered station {} from alert intake", station.name);
        Ok(station)
    }
}
