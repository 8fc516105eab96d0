//! Station flag maintenance.
//!
//! `has_active_alert` and `has_active_incident` are derived data. They are
//! recomputed from alerts, incidents and pending referrals after every
//! change instead of being toggled in place.

use crate::dispatcher::Dispatcher;
use crate::store::StoreExt;
use dispatch_shared::{
    AlertStatus, DispatchEvent, EmergencyAlert, Incident, Referral, ReferralSubject, Result,
    Station, StationFlags,
};
use tracing::{debug, info};

/// Flags as they should be for `station_id`, from current documents
pub(crate) fn derive_flags(dispatcher: &Dispatcher, station_id: &str) -> Result<StationFlags> {
    let store = &dispatcher.store;

    let owns_active_alert = store
        .find_first(|a: &EmergencyAlert| {
            a.station_id == station_id && a.status == AlertStatus::Active
        })?
        .is_some();
    let has_open_incident = store
        .find_first(|i: &Incident| i.station_id == station_id && i.status.is_open())?
        .is_some();

    let incoming: Vec<Referral> =
        store.list_where(|r: &Referral| r.is_pending() && r.to_station_id == station_id)?;
    let awaiting_alert = incoming.iter().any(|r| r.subject == ReferralSubject::Alert);
    let awaiting_incident = incoming.iter().any(|r| r.subject == ReferralSubject::Incident);

    Ok(StationFlags {
        station_id: station_id.to_string(),
        has_active_alert: owns_active_alert || awaiting_alert,
        has_active_incident: has_open_incident || awaiting_incident,
    })
}

impl Dispatcher {
    /// Recompute one station's flags, writing and announcing only on change.
    /// Returns the current flags, or `None` if the station no longer exists.
    pub(crate) fn refresh_station_flags(&self, station_id: &str) -> Result<Option<StationFlags>> {
        let Some(mut station) = self.store.get::<Station>(station_id)? else {
            debug!("Skipping flag refresh for missing station {}", station_id);
            return Ok(None);
        };

        let flags = derive_flags(self, station_id)?;
        if station.has_active_alert == flags.has_active_alert
            && station.has_active_incident == flags.has_active_incident
        {
            return Ok(Some(flags));
        }

        info!(
            "Station {} flags: active_alert={} active_incident={}",
            station.name, flags.has_active_alert, flags.has_active_incident
        );
        station.has_active_alert = flags.has_active_alert;
        station.has_active_incident = flags.has_active_incident;
        station.updated_at = chrono::Utc::now();
        self.store.put(&station)?;
        self.emit(DispatchEvent::StationFlagsChanged(flags.clone()));
        Ok(Some(flags))
    }

    pub(crate) fn refresh_stations<'a>(
        &self,
        station_ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for id in station_ids {
            if !seen.contains(&id) {
                seen.push(id);
                self.refresh_station_flags(id)?;
            }
        }
        Ok(())
    }

    /// Sweep every station; returns how many were corrected
    pub fn recompute_all_flags(&self) -> Result<usize> {
        let _gate = self.gate();
        let stations: Vec<Station> = self.store.list()?;
        let mut corrected = 0;
        for station in &stations {
            if let Some(flags) = self.refresh_station_flags(&station.id)? {
                if flags != station.flags() {
                    corrected += 1;
                }
            }
        }
        info!(
            "Flag sweep: {} station(s), {} corrected",
            stations.len(),
            corrected
        );
        Ok(corrected)
    }
}
