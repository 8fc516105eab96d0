//! Referral workflow: hand an alert or open incident to another station.
//!
//! Creating a referral locks the subject at the source station. Ownership
//! moves only when the target accepts; a rejection hands the subject back
//! unchanged.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use crate::triage::ensure_triageable;
use dispatch_shared::{
    AlertStatus, DispatchError, DispatchEvent, EmergencyAlert, Incident, Referral,
    ReferralStatus, ReferralSubject, Result, Station,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralResponse {
    pub accept: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralQuery {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub status: Option<ReferralStatus>,
    #[serde(default)]
    pub subject_id: Option<String>,
}

impl ReferralQuery {
    pub fn matches(&self, referral: &Referral) -> bool {
        self.station_id
            .as_deref()
            .map_or(true, |id| referral.involves(id))
            && self.status.map_or(true, |s| referral.status == s)
            && self
                .subject_id
                .as_deref()
                .map_or(true, |id| referral.subject_id == id)
    }
}

impl Dispatcher {
    pub fn create_referral(
        &self,
        subject: ReferralSubject,
        subject_id: &str,
        to_station_id: &str,
        reason: &str,
    ) -> Result<Referral> {
        let to_station_id = to_station_id.trim();
        let reason = reason.trim();
        if to_station_id.is_empty() {
            return Err(DispatchError::validation("to_station_id is required"));
        }
        if reason.is_empty() {
            return Err(DispatchError::validation("a referral reason is required"));
        }

        let _gate = self.gate();

        // Subject must still be referable
        let from_station_id = match subject {
            ReferralSubject::Alert => {
                let alert = self.store.require::<EmergencyAlert>(subject_id)?;
                ensure_triageable(&alert, AlertStatus::Referred)?;
                alert.station_id
            }
            ReferralSubject::Incident => {
                let incident = self.store.require::<Incident>(subject_id)?;
                ensure_incident_referable(&incident)?;
                incident.station_id
            }
        };

        self.ensure_target_available(&from_station_id, to_station_id)?;

        let referral = Referral::new(subject, subject_id, &from_station_id, to_station_id, reason);
        self.store.put(&referral)?;

        let subject_event = match subject {
            ReferralSubject::Alert => {
                let mut alert = self.store.require::<EmergencyAlert>(subject_id)?;
                alert.status = AlertStatus::Referred;
                alert.referred_to_station_id = Some(to_station_id.to_string());
                alert.touch();
                self.store.put(&alert)?;
                DispatchEvent::AlertUpdated(alert)
            }
            ReferralSubject::Incident => {
                let mut incident = self.store.require::<Incident>(subject_id)?;
                incident.referred_to_station_id = Some(to_station_id.to_string());
                incident.updated_at = chrono::Utc::now();
                self.store.put(&incident)?;
                DispatchEvent::IncidentUpdated(incident)
            }
        };
        info!(
            "Referral {}: {} {} from {} to {}",
            referral.id, subject, subject_id, from_station_id, to_station_id
        );

        self.refresh_stations([from_station_id.as_str(), to_station_id])?;
        self.emit(DispatchEvent::ReferralCreated(referral.clone()));
        self.emit(subject_event);
        Ok(referral)
    }

    /// Target must exist, differ from the source, be commissioned and idle
    fn ensure_target_available(&self, from_station_id: &str, to_station_id: &str) -> Result<()> {
        if from_station_id == to_station_id {
            return Err(DispatchError::validation(
                "cannot refer to the station that already owns it",
            ));
        }
        let target = self.store.require::<Station>(to_station_id)?;
        if !target.is_commissioned() {
            warn!("Referral target {} is {}", target.name, target.commission_status);
            return Err(DispatchError::unavailable(
                &target.id,
                format!("station is {}", target.commission_status),
            ));
        }

        // Stored flags may be stale if documents were edited out of band
        let flags = self
            .refresh_station_flags(&target.id)?
            .unwrap_or_else(|| target.flags());
        if flags.has_active_alert {
            warn!("Referral target {} has an active alert", target.name);
            return Err(DispatchError::unavailable(
                &target.id,
                "station has an active alert",
            ));
        }
        if flags.has_active_incident {
            warn!("Referral target {} has an active incident", target.name);
            return Err(DispatchError::unavailable(
                &target.id,
                "station has an active incident",
            ));
        }
        Ok(())
    }

    pub fn respond_referral(&self, referral_id: &str, resp: ReferralResponse) -> Result<Referral> {
        let _gate = self.gate();
        let mut referral = self.store.require::<Referral>(referral_id)?;
        let outcome = if resp.accept {
            ReferralStatus::Accepted
        } else {
            ReferralStatus::Rejected
        };
        if !referral.is_pending() {
            return Err(DispatchError::InvalidTransition {
                entity: "referral",
                from: referral.status.to_string(),
                to: outcome.to_string(),
            });
        }

        let subject_event = match referral.subject {
            ReferralSubject::Alert => {
                DispatchEvent::AlertUpdated(self.settle_alert_referral(&referral, resp.accept)?)
            }
            ReferralSubject::Incident => DispatchEvent::IncidentUpdated(
                self.settle_incident_referral(&referral, resp.accept)?,
            ),
        };

        referral.status = outcome;
        referral.response_note = resp.note.filter(|n| !n.trim().is_empty());
        referral.responded_at = Some(chrono::Utc::now());
        self.store.put(&referral)?;
        info!("Referral {} {}", referral.id, referral.status);

        self.refresh_stations([
            referral.from_station_id.as_str(),
            referral.to_station_id.as_str(),
        ])?;
        self.emit(DispatchEvent::ReferralUpdated(referral.clone()));
        self.emit(subject_event);
        Ok(referral)
    }

    fn settle_alert_referral(&self, referral: &Referral, accept: bool) -> Result<EmergencyAlert> {
        let mut alert = self.store.require::<EmergencyAlert>(&referral.subject_id)?;
        if alert.status != AlertStatus::Referred {
            return Err(DispatchError::Conflict(format!(
                "alert {} is {} but referral {} is pending",
                alert.id, alert.status, referral.id
            )));
        }

        if accept {
            let target = self.store.require::<Station>(&referral.to_station_id)?;
            if !target.is_commissioned() {
                return Err(DispatchError::unavailable(
                    &target.id,
                    format!("station is {}", target.commission_status),
                ));
            }
            let assignment = self.find_operations_unit(&target.id)?;
            alert.station_id = target.id;
            alert.department_id = assignment.as_ref().map(|a| a.department.id.clone());
            alert.unit_id = assignment.map(|a| a.unit.id);
        }
        alert.status = AlertStatus::Active;
        alert.referred_to_station_id = None;
        alert.touch();
        self.store.put(&alert)?;
        Ok(alert)
    }

    fn settle_incident_referral(&self, referral: &Referral, accept: bool) -> Result<Incident> {
        let mut incident = self.store.require::<Incident>(&referral.subject_id)?;

        if accept {
            let target = self.store.require::<Station>(&referral.to_station_id)?;
            if !target.is_commissioned() {
                return Err(DispatchError::unavailable(
                    &target.id,
                    format!("station is {}", target.commission_status),
                ));
            }
            let assignment = self.select_operations_unit(&target.id)?;
            incident.station_id = target.id;
            incident.department_id = assignment.department.id;
            incident.unit_id = assignment.unit.id;
        }
        incident.referred_to_station_id = None;
        incident.updated_at = chrono::Utc::now();
        self.store.put(&incident)?;
        Ok(incident)
    }

    pub fn list_referrals(&self, query: &ReferralQuery) -> Result<Vec<Referral>> {
        self.store.list_where(|r: &Referral| query.matches(r))
    }
}

pub(crate) fn ensure_incident_referable(incident: &Incident) -> Result<()> {
    if !incident.status.is_open() {
        return Err(DispatchError::InvalidTransition {
            entity: "incident",
            from: incident.status.to_string(),
            to: "referred".to_string(),
        });
    }
    if incident.has_pending_referral() {
        return Err(DispatchError::Conflict(format!(
            "incident {} already has a pending referral",
            incident.id
        )));
    }
    Ok(())
}
