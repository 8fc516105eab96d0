//! Incident provisioning on alert acceptance.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    Department, DispatchError, DispatchEvent, EmergencyAlert, Incident, Result, Unit,
};
use tracing::{debug, info};

/// An Operations department and the unit chosen from it
#[derive(Debug, Clone, PartialEq)]
pub struct OperationsAssignment {
    pub department: Department,
    pub unit: Unit,
}

impl Dispatcher {
    /// First Operations department (creation order) that has an active unit,
    /// paired with its earliest-created active unit.
    pub fn find_operations_unit(&self, station_id: &str) -> Result<Option<OperationsAssignment>> {
        let departments = self
            .store
            .list_where(|d: &Department| d.station_id == station_id && d.is_operations())?;
        if departments.is_empty() {
            debug!("Station {} has no Operations department", station_id);
            return Ok(None);
        }

        let units: Vec<Unit> = self.store.list_where(|u: &Unit| u.is_active)?;
        for department in departments {
            if let Some(unit) = units.iter().find(|u| u.department_id == department.id) {
                return Ok(Some(OperationsAssignment {
                    unit: unit.clone(),
                    department,
                }));
            }
        }

        debug!("Station {} has no active Operations unit", station_id);
        Ok(None)
    }

    pub fn select_operations_unit(&self, station_id: &str) -> Result<OperationsAssignment> {
        self.find_operations_unit(station_id)?
            .ok_or_else(|| DispatchError::NoOperationalUnit {
                station_id: station_id.to_string(),
            })
    }

    /// Create the incident for an accepted alert. Caller holds the gate and
    /// updates the alert itself.
    pub(crate) fn provision_incident(&self, alert: &EmergencyAlert) -> Result<Incident> {
        let assignment = self.select_operations_unit(&alert.station_id)?;
        let incident = Incident::new(
            &alert.id,
            &alert.station_id,
            &assignment.department.id,
            &assignment.unit.id,
        );
        self.store.put(&incident)?;
        info!(
            "Provisioned incident {} for alert {} (unit {})",
            incident.id, alert.id, assignment.unit.name
        );

        self.refresh_station_flags(&incident.station_id)?;
        self.emit(DispatchEvent::IncidentCreated(incident.clone()));
        Ok(incident)
    }
}
