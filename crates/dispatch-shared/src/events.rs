//! Notification events fanned out to live clients.
//!
//! Serialized as `{"type": "...", "data": {...}}` so clients can switch on
//! the tag without knowing every payload shape.

use crate::alert::EmergencyAlert;
use crate::incident::Incident;
use crate::referral::Referral;
use crate::station::StationFlags;
use crate::turnout::TurnoutSlip;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DispatchEvent {
    AlertCreated(EmergencyAlert),
    AlertUpdated(EmergencyAlert),
    IncidentCreated(Incident),
    IncidentUpdated(Incident),
    ReferralCreated(Referral),
    ReferralUpdated(Referral),
    StationFlagsChanged(StationFlags),
    TurnoutSlipCreated(TurnoutSlip),
}

impl DispatchEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlertCreated(_) => "alert_created",
            Self::AlertUpdated(_) => "alert_updated",
            Self::IncidentCreated(_) => "incident_created",
            Self::IncidentUpdated(_) => "incident_updated",
            Self::ReferralCreated(_) => "referral_created",
            Self::ReferralUpdated(_) => "referral_updated",
            Self::StationFlagsChanged(_) => "station_flags_changed",
            Self::TurnoutSlipCreated(_) => "turnout_slip_created",
        }
    }

    /// Stations this event concerns
    pub fn stations(&self) -> Vec<&str> {
        let mut ids = match self {
            Self::AlertCreated(a) | Self::AlertUpdated(a) => {
                let mut ids = vec![a.station_id.as_str()];
                if let Some(target) = a.referred_to_station_id.as_deref() {
                    ids.push(target);
                }
                ids
            }
            Self::IncidentCreated(i) | Self::IncidentUpdated(i) => {
                let mut ids = vec![i.station_id.as_str()];
                if let Some(target) = i.referred_to_station_id.as_deref() {
                    ids.push(target);
                }
                ids
            }
            Self::ReferralCreated(r) | Self::ReferralUpdated(r) => {
                vec![r.from_station_id.as_str(), r.to_station_id.as_str()]
            }
            Self::StationFlagsChanged(f) => vec![f.station_id.as_str()],
            Self::TurnoutSlipCreated(s) => vec![s.station.id.as_str()],
        };
        ids.dedup();
        ids
    }

    pub fn concerns(&self, station_id: &str) -> bool {
        self.stations().contains(&station_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referral::ReferralSubject;

    #[test]
    fn test_referral_event_concerns_both_stations() {
        let referral = Referral::new(ReferralSubject::Alert, "a1", "s1", "s2", "out of area");
        let event = DispatchEvent::ReferralCreated(referral);
        assert!(event.concerns("s1"));
        assert!(event.concerns("s2"));
        assert!(!event.concerns("s3"));
    }

    #[test]
    fn test_event_wire_shape() {
        let event = DispatchEvent::StationFlagsChanged(StationFlags {
            station_id: "s1".into(),
            has_active_alert: true,
            has_active_incident: false,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "station_flags_changed");
        assert_eq!(value["data"]["station_id"], "s1");
        assert_eq!(event.kind(), "station_flags_changed");
    }
}
