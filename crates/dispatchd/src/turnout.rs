//! Turnout slips: the dispatch record captured when a unit turns out.
//!
//! Names are copied into the slip so it stays readable after stations,
//! units or reporters are renamed or removed.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    Citizen, Department, DispatchError, DispatchEvent, EmergencyAlert, Incident, NamedRef,
    Personnel, ReporterKind, ReporterRef, ReporterSnapshot, Result, Station, TurnoutSlip, Unit,
};
use tracing::info;

const UNKNOWN: &str = "unknown";

impl Dispatcher {
    /// The slip for a dispatched incident, generated on first request
    pub fn turnout_slip(&self, incident_id: &str) -> Result<TurnoutSlip> {
        let _gate = self.gate();
        let incident = self.store.require::<Incident>(incident_id)?;
        if incident.dispatched_at.is_none() {
            return Err(DispatchError::Conflict(format!(
                "incident {} has not been dispatched",
                incident.id
            )));
        }
        self.issue_turnout_slip(&incident)
    }

    /// One slip per incident; an existing slip is returned unchanged
    pub(crate) fn issue_turnout_slip(&self, incident: &Incident) -> Result<TurnoutSlip> {
        if let Some(existing) = self
            .store
            .find_first(|s: &TurnoutSlip| s.incident_id == incident.id)?
        {
            return Ok(existing);
        }

        let alert = self.store.require::<EmergencyAlert>(&incident.alert_id)?;
        let station = self.store.get::<Station>(&incident.station_id)?;
        let department = self.store.get::<Department>(&incident.department_id)?;
        let unit = self.store.get::<Unit>(&incident.unit_id)?;
        let now = chrono::Utc::now();

        let slip = TurnoutSlip {
            id: dispatch_shared::new_id(),
            alert_id: alert.id.clone(),
            incident_id: incident.id.clone(),
            station: NamedRef::new(
                &incident.station_id,
                station.map(|s| s.name).unwrap_or_else(|| UNKNOWN.into()),
            ),
            department: NamedRef::new(
                &incident.department_id,
                department.map(|d| d.name).unwrap_or_else(|| UNKNOWN.into()),
            ),
            unit: NamedRef::new(
                &incident.unit_id,
                unit.map(|u| u.name).unwrap_or_else(|| UNKNOWN.into()),
            ),
            incident_type: alert.incident_type.clone(),
            description: alert.description.clone(),
            location: alert.location.clone(),
            reporter: self.reporter_snapshot(&alert.reporter)?,
            reported_at: alert.created_at,
            dispatched_at: incident.dispatched_at.unwrap_or(now),
            created_at: now,
        };
        self.store.put(&slip)?;
        info!(
            "Turnout slip {} issued for incident {} ({})",
            slip.id, incident.id, slip.unit.name
        );

        self.emit(DispatchEvent::TurnoutSlipCreated(slip.clone()));
        Ok(slip)
    }

    fn reporter_snapshot(&self, reporter: &ReporterRef) -> Result<ReporterSnapshot> {
        let (name, phone) = match reporter.kind {
            ReporterKind::Citizen => self
                .store
                .get::<Citizen>(&reporter.id)?
                .map(|c| (c.name, c.phone)),
            ReporterKind::Personnel => self
                .store
                .get::<Personnel>(&reporter.id)?
                .map(|p| (p.name, p.phone)),
        }
        .unwrap_or_else(|| (UNKNOWN.to_string(), None));

        Ok(ReporterSnapshot {
            kind: reporter.kind,
            id: reporter.id.clone(),
            name,
            phone,
        })
    }
}
