//! Alert triage: accept, decline or refer an active alert.
//!
//! Only `active` alerts can be triaged. Accepted and rejected alerts are
//! final; a referred alert is locked until its referral is answered.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    AlertStatus, DispatchError, DispatchEvent, EmergencyAlert, Incident, Referral,
    ReferralSubject, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclineRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferRequest {
    pub to_station_id: String,
    #[serde(default)]
    pub reason: String,
}

/// Outcome of accepting an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acceptance {
    pub alert: EmergencyAlert,
    pub incident: Incident,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub status: Option<AlertStatus>,
}

impl AlertQuery {
    pub fn matches(&self, alert: &EmergencyAlert) -> bool {
        self.station_id
            .as_deref()
            .map_or(true, |id| alert.station_id == id)
            && self.status.map_or(true, |s| alert.status == s)
    }
}

/// Guard shared by every triage operation
pub(crate) fn ensure_triageable(alert: &EmergencyAlert, to: AlertStatus) -> Result<()> {
    if alert.status.can_triage() {
        return Ok(());
    }
    warn!(
        "Refused triage of alert {}: {} -> {}",
        alert.id, alert.status, to
    );
    Err(DispatchError::InvalidTransition {
        entity: "alert",
        from: alert.status.to_string(),
        to: to.to_string(),
    })
}

impl Dispatcher {
    pub fn accept_alert(&self, alert_id: &str) -> Result<Acceptance> {
        let _gate = self.gate();
        let mut alert = self.store.require::<EmergencyAlert>(alert_id)?;
        ensure_triageable(&alert, AlertStatus::Accepted)?;

        let incident = self.provision_incident(&alert)?;

        alert.status = AlertStatus::Accepted;
        alert.incident_id = Some(incident.id.clone());
        alert.department_id = Some(incident.department_id.clone());
        alert.unit_id = Some(incident.unit_id.clone());
        alert.touch();
        self.store.put(&alert)?;
        info!("Alert {} accepted, incident {}", alert.id, incident.id);

        self.refresh_station_flags(&alert.station_id)?;
        self.emit(DispatchEvent::AlertUpdated(alert.clone()));
        Ok(Acceptance { alert, incident })
    }

    pub fn decline_alert(&self, alert_id: &str, req: DeclineRequest) -> Result<EmergencyAlert> {
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(DispatchError::validation("a decline reason is required"));
        }

        let _gate = self.gate();
        let mut alert = self.store.require::<EmergencyAlert>(alert_id)?;
        ensure_triageable(&alert, AlertStatus::Rejected)?;

        alert.status = AlertStatus::Rejected;
        alert.decline_reason = Some(reason.to_string());
        alert.touch();
        self.store.put(&alert)?;
        info!("Alert {} declined: {}", alert.id, reason);

        self.refresh_station_flags(&alert.station_id)?;
        self.emit(DispatchEvent::AlertUpdated(alert.clone()));
        Ok(alert)
    }

    pub fn refer_alert(&self, alert_id: &str, req: ReferRequest) -> Result<Referral> {
        self.create_referral(
            ReferralSubject::Alert,
            alert_id,
            &req.to_station_id,
            &req.reason,
        )
    }

    pub fn get_alert(&self, alert_id: &str) -> Result<EmergencyAlert> {
        self.store.require(alert_id)
    }

    pub fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<EmergencyAlert>> {
        self.store.list_where(|a: &EmergencyAlert| query.matches(a))
    }
}
