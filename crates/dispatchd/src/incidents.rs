//! Incident lifecycle: active -> dispatched -> on_scene -> resolved -> closed.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    DispatchError, DispatchEvent, Incident, IncidentStatus, Referral, ReferralSubject, Result,
    TurnoutSlip,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// Target status; defaults to the next step
    #[serde(default)]
    pub to: Option<IncidentStatus>,
}

impl AdvanceRequest {
    /// Decode a request body. Only an empty body means "next step"; anything
    /// else must name a known status.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| DispatchError::validation(format!("invalid advance request: {}", e)))
    }
}

/// Result of an advance, with the slip when the step was `dispatched`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advancement {
    pub incident: Incident,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnout_slip: Option<TurnoutSlip>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentQuery {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
}

impl IncidentQuery {
    pub fn matches(&self, incident: &Incident) -> bool {
        self.station_id
            .as_deref()
            .map_or(true, |id| incident.station_id == id)
            && self.status.map_or(true, |s| incident.status == s)
    }
}

impl Dispatcher {
    pub fn advance_incident(&self, incident_id: &str, req: AdvanceRequest) -> Result<Advancement> {
        let _gate = self.gate();
        let mut incident = self.store.require::<Incident>(incident_id)?;

        let next = incident.status.next();
        let to = req.to.or(next).ok_or_else(|| DispatchError::InvalidTransition {
            entity: "incident",
            from: incident.status.to_string(),
            to: "none".to_string(),
        })?;
        if Some(to) != next {
            warn!(
                "Refused incident {} transition {} -> {}",
                incident.id, incident.status, to
            );
            return Err(DispatchError::InvalidTransition {
                entity: "incident",
                from: incident.status.to_string(),
                to: to.to_string(),
            });
        }
        if incident.has_pending_referral() {
            return Err(DispatchError::Conflict(format!(
                "incident {} has a pending referral",
                incident.id
            )));
        }

        incident.enter(to, chrono::Utc::now());
        self.store.put(&incident)?;
        info!("Incident {} is now {}", incident.id, incident.status);

        let turnout_slip = if to == IncidentStatus::Dispatched {
            Some(self.issue_turnout_slip(&incident)?)
        } else {
            None
        };

        self.refresh_station_flags(&incident.station_id)?;
        self.emit(DispatchEvent::IncidentUpdated(incident.clone()));
        Ok(Advancement {
            incident,
            turnout_slip,
        })
    }

    pub fn refer_incident(
        &self,
        incident_id: &str,
        to_station_id: &str,
        reason: &str,
    ) -> Result<Referral> {
        self.create_referral(ReferralSubject::Incident, incident_id, to_station_id, reason)
    }

    pub fn get_incident(&self, incident_id: &str) -> Result<Incident> {
        self.store.require(incident_id)
    }

    pub fn list_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>> {
        self.store.list_where(|i: &Incident| query.matches(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_means_next_step() {
        assert!(AdvanceRequest::from_body(b"").unwrap().to.is_none());
        assert!(AdvanceRequest::from_body(b" \n").unwrap().to.is_none());
        assert!(AdvanceRequest::from_body(b"{}").unwrap().to.is_none());
    }

    #[test]
    fn test_named_target_is_decoded() {
        let req = AdvanceRequest::from_body(br#"{"to":"on_scene"}"#).unwrap();
        assert_eq!(req.to, Some(IncidentStatus::OnScene));
    }

    #[test]
    fn test_unknown_or_malformed_body_is_refused() {
        for body in [&br#"{"to":"on-scene"}"#[..], &b"{not json"[..], &b"null"[..]] {
            let err = AdvanceRequest::from_body(body).unwrap_err();
            assert!(matches!(err, DispatchError::Validation(_)));
        }
    }
}
