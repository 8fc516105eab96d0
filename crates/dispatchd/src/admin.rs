//! Administrative records: stations, departments, units, citizens, personnel.
//!
//! Plain CRUD with the guards that keep the workflows sound: unique station
//! names, parents must exist, and a busy station can neither be
//! decommissioned nor deleted.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    Citizen, CommissionStatus, Department, DispatchError, EmergencyAlert, GeoPoint, Incident,
    Personnel, Referral, Result, Station, Unit,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationInput {
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub commission_status: Option<CommissionStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub commission_status: Option<CommissionStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentInput {
    pub station_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentPatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInput {
    pub department_id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitizenPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelInput {
    pub name: String,
    pub station_id: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonnelPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

fn required_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::validation(format!("{} name is required", what)));
    }
    Ok(trimmed.to_string())
}

impl Dispatcher {
    // ------------------------------------------------------------------
    // Stations
    // ------------------------------------------------------------------

    pub fn create_station(&self, input: StationInput) -> Result<Station> {
        let name = required_name(&input.name, "station")?;
        if let Some(location) = &input.location {
            location.validate()?;
        }

        let _gate = self.gate();
        self.ensure_station_name_free(&name, None)?;

        let mut station = Station::new(name);
        station.location = input.location;
        station.phone = input.phone;
        station.region = input.region;
        station.commission_status = input.commission_status.unwrap_or_default();
        self.store.put(&station)?;
        info!("Created station {} ({})", station.name, station.id);
        Ok(station)
    }

    pub fn get_station(&self, station_id: &str) -> Result<Station> {
        self.store.require(station_id)
    }

    pub fn list_stations(&self) -> Result<Vec<Station>> {
        self.store.list()
    }

    pub fn update_station(&self, station_id: &str, patch: StationPatch) -> Result<Station> {
        let _gate = self.gate();
        let mut station = self.store.require::<Station>(station_id)?;

        if let Some(name) = patch.name {
            let name = required_name(&name, "station")?;
            self.ensure_station_name_free(&name, Some(&station.id))?;
            station.name = name;
        }
        if let Some(location) = patch.location {
            location.validate()?;
            station.location = Some(location);
        }
        if patch.phone.is_some() {
            station.phone = patch.phone;
        }
        if patch.region.is_some() {
            station.region = patch.region;
        }
        if let Some(status) = patch.commission_status {
            if status != CommissionStatus::Commissioned && self.station_has_open_work(&station.id)? {
                return Err(DispatchError::Conflict(format!(
                    "station {} has open alerts or incidents",
                    station.name
                )));
            }
            station.commission_status = status;
        }

        station.updated_at = chrono::Utc::now();
        self.store.put(&station)?;
        info!("Updated station {}", station.name);
        Ok(station)
    }

    /// Removes the station with its departments and units. Personnel must
    /// be reassigned or removed first.
    pub fn delete_station(&self, station_id: &str) -> Result<()> {
        let _gate = self.gate();
        let station = self.store.require::<Station>(station_id)?;
        if self.station_has_open_work(&station.id)? {
            return Err(DispatchError::Conflict(format!(
                "station {} has open alerts or incidents",
                station.name
            )));
        }
        let assigned = self
            .store
            .list_where(|p: &Personnel| p.station_id == station.id)?;
        if !assigned.is_empty() {
            return Err(DispatchError::Conflict(format!(
                "station {} still has {} personnel assigned",
                station.name,
                assigned.len()
            )));
        }

        let departments = self
            .store
            .list_where(|d: &Department| d.station_id == station.id)?;
        for department in &departments {
            self.delete_department_tree(department)?;
        }
        self.store.delete::<Station>(&station.id)?;
        info!(
            "Deleted station {} and {} department(s)",
            station.name,
            departments.len()
        );
        Ok(())
    }

    fn ensure_station_name_free(&self, name: &str, except: Option<&str>) -> Result<()> {
        let clash = self
            .store
            .find_first(|s: &Station| s.name_matches(name) && Some(s.id.as_str()) != except)?;
        match clash {
            Some(existing) => Err(DispatchError::Conflict(format!(
                "station name '{}' is already used by {}",
                name, existing.id
            ))),
            None => Ok(()),
        }
    }

    /// Active or referred alerts, open incidents, or pending referrals
    fn station_has_open_work(&self, station_id: &str) -> Result<bool> {
        let alert = self.store.find_first(|a: &EmergencyAlert| {
            a.station_id == station_id && !a.status.is_final()
        })?;
        if alert.is_some() {
            return Ok(true);
        }
        let incident = self
            .store
            .find_first(|i: &Incident| i.station_id == station_id && i.status.is_open())?;
        if incident.is_some() {
            return Ok(true);
        }
        let referral = self
            .store
            .find_first(|r: &Referral| r.is_pending() && r.involves(station_id))?;
        Ok(referral.is_some())
    }

    // ------------------------------------------------------------------
    // Departments
    // ------------------------------------------------------------------

    pub fn create_department(&self, input: DepartmentInput) -> Result<Department> {
        let name = required_name(&input.name, "department")?;
        let _gate = self.gate();
        let station = self.store.require::<Station>(input.station_id.trim())?;

        let department = Department::new(&station.id, name);
        self.store.put(&department)?;
        info!("Created department {} at {}", department.name, station.name);
        Ok(department)
    }

    pub fn get_department(&self, department_id: &str) -> Result<Department> {
        self.store.require(department_id)
    }

    pub fn list_departments(&self, station_id: Option<&str>) -> Result<Vec<Department>> {
        self.store
            .list_where(|d: &Department| station_id.map_or(true, |id| d.station_id == id))
    }

    pub fn update_department(
        &self,
        department_id: &str,
        patch: DepartmentPatch,
    ) -> Result<Department> {
        let _gate = self.gate();
        let mut department = self.store.require::<Department>(department_id)?;
        if let Some(name) = patch.name {
            department.name = required_name(&name, "department")?;
        }
        self.store.put(&department)?;
        Ok(department)
    }

    /// Removes the department and its units
    pub fn delete_department(&self, department_id: &str) -> Result<()> {
        let _gate = self.gate();
        let department = self.store.require::<Department>(department_id)?;
        self.delete_department_tree(&department)
    }

    fn delete_department_tree(&self, department: &Department) -> Result<()> {
        let units = self
            .store
            .list_where(|u: &Unit| u.department_id == department.id)?;
        for unit in &units {
            self.store.delete::<Unit>(&unit.id)?;
        }
        self.store.delete::<Department>(&department.id)?;
        info!(
            "Deleted department {} and {} unit(s)",
            department.name,
            units.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    pub fn create_unit(&self, input: UnitInput) -> Result<Unit> {
        let name = required_name(&input.name, "unit")?;
        let _gate = self.gate();
        let department = self.store.require::<Department>(input.department_id.trim())?;

        let mut unit = Unit::new(&department.id, name);
        unit.is_active = input.is_active.unwrap_or(true);
        self.store.put(&unit)?;
        info!("Created unit {} in {}", unit.name, department.name);
        Ok(unit)
    }

    pub fn get_unit(&self, unit_id: &str) -> Result<Unit> {
        self.store.require(unit_id)
    }

    pub fn list_units(&self, department_id: Option<&str>) -> Result<Vec<Unit>> {
        self.store
            .list_where(|u: &Unit| department_id.map_or(true, |id| u.department_id == id))
    }

    pub fn update_unit(&self, unit_id: &str, patch: UnitPatch) -> Result<Unit> {
        let _gate = self.gate();
        let mut unit = self.store.require::<Unit>(unit_id)?;
        if let Some(name) = patch.name {
            unit.name = required_name(&name, "unit")?;
        }
        if let Some(active) = patch.is_active {
            unit.is_active = active;
        }
        self.store.put(&unit)?;
        Ok(unit)
    }

    pub fn delete_unit(&self, unit_id: &str) -> Result<()> {
        let _gate = self.gate();
        if !self.store.delete::<Unit>(unit_id)? {
            return Err(DispatchError::not_found("unit", unit_id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reporters
    // ------------------------------------------------------------------

    pub fn create_citizen(&self, input: CitizenInput) -> Result<Citizen> {
        let name = required_name(&input.name, "citizen")?;
        let _gate = self.gate();
        let citizen = Citizen::new(name, input.phone);
        self.store.put(&citizen)?;
        Ok(citizen)
    }

    pub fn get_citizen(&self, citizen_id: &str) -> Result<Citizen> {
        self.store.require(citizen_id)
    }

    pub fn list_citizens(&self) -> Result<Vec<Citizen>> {
        self.store.list()
    }

    pub fn update_citizen(&self, citizen_id: &str, patch: CitizenPatch) -> Result<Citizen> {
        let _gate = self.gate();
        let mut citizen = self.store.require::<Citizen>(citizen_id)?;
        if let Some(name) = patch.name {
            citizen.name = required_name(&name, "citizen")?;
        }
        if patch.phone.is_some() {
            citizen.phone = patch.phone;
        }
        self.store.put(&citizen)?;
        Ok(citizen)
    }

    pub fn delete_citizen(&self, citizen_id: &str) -> Result<()> {
        let _gate = self.gate();
        if !self.store.delete::<Citizen>(citizen_id)? {
            return Err(DispatchError::not_found("citizen", citizen_id));
        }
        Ok(())
    }

    pub fn create_personnel(&self, input: PersonnelInput) -> Result<Personnel> {
        let name = required_name(&input.name, "personnel")?;
        let _gate = self.gate();
        let station = self.store.require::<Station>(input.station_id.trim())?;

        let mut personnel = Personnel::new(name, &station.id);
        personnel.rank = input.rank;
        personnel.phone = input.phone;
        self.store.put(&personnel)?;
        info!("Registered personnel {} at {}", personnel.name, station.name);
        Ok(personnel)
    }

    pub fn get_personnel(&self, personnel_id: &str) -> Result<Personnel> {
        self.store.require(personnel_id)
    }

    pub fn list_personnel(&self, station_id: Option<&str>) -> Result<Vec<Personnel>> {
        self.store
            .list_where(|p: &Personnel| station_id.map_or(true, |id| p.station_id == id))
    }

    pub fn update_personnel(&self, personnel_id: &str, patch: PersonnelPatch) -> Result<Personnel> {
        let _gate = self.gate();
        let mut personnel = self.store.require::<Personnel>(personnel_id)?;
        if let Some(name) = patch.name {
            personnel.name = required_name(&name, "personnel")?;
        }
        if let Some(station_id) = patch.station_id {
            personnel.station_id = self.store.require::<Station>(station_id.trim())?.id;
        }
        if patch.rank.is_some() {
            personnel.rank = patch.rank;
        }
        if patch.phone.is_some() {
            personnel.phone = patch.phone;
        }
        self.store.put(&personnel)?;
        Ok(personnel)
    }

    pub fn delete_personnel(&self, personnel_id: &str) -> Result<()> {
        let _gate = self.gate();
        if !self.store.delete::<Personnel>(personnel_id)? {
            return Err(DispatchError::not_found("personnel", personnel_id));
        }
        Ok(())
    }
}
