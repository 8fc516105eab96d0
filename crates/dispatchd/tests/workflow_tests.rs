//! Workflow tests over the in-memory store.
//!
//! Covers intake, triage, referrals in both directions, the incident
//! lifecycle with its turnout slip, and the station flags that every
//! transition is expected to leave consistent.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p dispatchd --test workflow_tests
//! ```

use dispatch_shared::{
    AlertStatus, CommissionStatus, Department, DispatchError, DispatchEvent, GeoPoint,
    IncidentStatus, ReferralStatus, ReporterKind, Station, Unit,
};
use dispatchd::admin::{CitizenInput, DepartmentInput, StationInput, StationPatch, UnitInput, UnitPatch};
use dispatchd::incidents::{AdvanceRequest, IncidentQuery};
use dispatchd::intake::NewAlertRequest;
use dispatchd::referral::{ReferralQuery, ReferralResponse};
use dispatchd::store::StoreExt;
use dispatchd::triage::{AlertQuery, DeclineRequest, ReferRequest};
use dispatchd::{Dispatcher, MemoryStore, Notifier};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(MemoryStore::new()), Notifier::new(64))
}

/// Station with an Operations department holding one active unit
fn equipped_station(d: &Dispatcher, name: &str) -> (Station, Department, Unit) {
    let station = d
        .create_station(StationInput {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap();
    let department = d
        .create_department(DepartmentInput {
            station_id: station.id.clone(),
            name: "Operations".to_string(),
        })
        .unwrap();
    let unit = d
        .create_unit(UnitInput {
            department_id: department.id.clone(),
            name: format!("{} Engine 1", name),
            is_active: None,
        })
        .unwrap();
    (station, department, unit)
}

fn bare_station(d: &Dispatcher, name: &str) -> Station {
    d.create_station(StationInput {
        name: name.to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn citizen_id(d: &Dispatcher) -> String {
    d.create_citizen(CitizenInput {
        name: "Ama Mensah".to_string(),
        phone: Some("+233 20 000 0000".to_string()),
    })
    .unwrap()
    .id
}

fn alert_request(reporter_id: &str, station_id: &str) -> NewAlertRequest {
    NewAlertRequest {
        incident_type: "structure fire".to_string(),
        description: Some("smoke from the second floor".to_string()),
        location: GeoPoint::new("Market Street", 5.5560, -0.1969),
        reporter_id: reporter_id.to_string(),
        reporter_kind: None,
        station_id: Some(station_id.to_string()),
        station_name: None,
    }
}

fn refer(to: &Station) -> ReferRequest {
    ReferRequest {
        to_station_id: to.id.clone(),
        reason: "closer to the scene".to_string(),
    }
}

fn flags(d: &Dispatcher, station_id: &str) -> (bool, bool) {
    let s = d.get_station(station_id).unwrap();
    (s.has_active_alert, s.has_active_incident)
}

fn accept() -> ReferralResponse {
    ReferralResponse {
        accept: true,
        note: None,
    }
}

fn reject() -> ReferralResponse {
    ReferralResponse {
        accept: false,
        note: Some("no crew available".to_string()),
    }
}

// ============================================================================
// Intake
// ============================================================================

#[test]
fn test_intake_assigns_operations_unit_and_sets_flag() {
    let d = dispatcher();
    let (station, department, unit) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);

    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();

    assert_eq!(alert.status, AlertStatus::Active);
    assert_eq!(alert.reporter.kind, ReporterKind::Citizen);
    assert_eq!(alert.department_id.as_deref(), Some(department.id.as_str()));
    assert_eq!(alert.unit_id.as_deref(), Some(unit.id.as_str()));
    assert_eq!(flags(&d, &station.id), (true, false));
}

#[test]
fn test_intake_by_unknown_name_registers_station() {
    let d = dispatcher();
    let reporter = citizen_id(&d);
    let mut req = alert_request(&reporter, "");
    req.station_id = None;
    req.station_name = Some("Harbour".to_string());

    let alert = d.submit_alert(req).unwrap();

    let station = d.get_station(&alert.station_id).unwrap();
    assert_eq!(station.name, "Harbour");
    assert!(station.has_active_alert);
    assert!(alert.unit_id.is_none());

    // Same name, different case, resolves to the same station
    let mut again = alert_request(&reporter, "");
    again.station_id = None;
    again.station_name = Some("HARBOUR".to_string());
    let second = d.submit_alert(again).unwrap();
    assert_eq!(second.station_id, station.id);
    assert_eq!(d.list_stations().unwrap().len(), 1);
}

#[test]
fn test_intake_resolves_personnel_reporter() {
    let d = dispatcher();
    let (station, _, _) = equipped_station(&d, "Central");
    let officer = d
        .create_personnel(dispatchd::admin::PersonnelInput {
            name: "Kofi Boateng".to_string(),
            station_id: station.id.clone(),
            rank: Some("Sub-officer".to_string()),
            phone: None,
        })
        .unwrap();

    let alert = d.submit_alert(alert_request(&officer.id, &station.id)).unwrap();
    assert_eq!(alert.reporter.kind, ReporterKind::Personnel);
}

#[test]
fn test_intake_rejects_unknown_reporter_and_station() {
    let d = dispatcher();
    let (station, _, _) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);

    let err = d
        .submit_alert(alert_request("nobody", &station.id))
        .unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { .. }));

    let err = d
        .submit_alert(alert_request(&reporter, "missing-station"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { kind: "station", .. }));

    assert!(d.list_alerts(&AlertQuery::default()).unwrap().is_empty());
}

#[test]
fn test_intake_refuses_decommissioned_station() {
    let d = dispatcher();
    let (station, _, _) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);
    d.update_station(
        &station.id,
        StationPatch {
            commission_status: Some(CommissionStatus::Decommissioned),
            ..Default::default()
        },
    )
    .unwrap();

    let err = d
        .submit_alert(alert_request(&reporter, &station.id))
        .unwrap_err();
    assert!(matches!(err, DispatchError::StationUnavailable { .. }));
}

// ============================================================================
// Triage
// ============================================================================

#[test]
fn test_accept_provisions_incident() {
    let d = dispatcher();
    let (station, department, unit) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();

    let acceptance = d.accept_alert(&alert.id).unwrap();

    assert_eq!(acceptance.alert.status, AlertStatus::Accepted);
    assert_eq!(
        acceptance.alert.incident_id.as_deref(),
        Some(acceptance.incident.id.as_str())
    );
    assert_eq!(acceptance.incident.status, IncidentStatus::Active);
    assert_eq!(acceptance.incident.alert_id, alert.id);
    assert_eq!(acceptance.incident.department_id, department.id);
    assert_eq!(acceptance.incident.unit_id, unit.id);
    assert_eq!(flags(&d, &station.id), (false, true));
}

#[test]
fn test_accept_skips_inactive_units() {
    let d = dispatcher();
    let (station, department, first) = equipped_station(&d, "Central");
    let second = d
        .create_unit(UnitInput {
            department_id: department.id.clone(),
            name: "Central Tanker".to_string(),
            is_active: Some(true),
        })
        .unwrap();
    d.update_unit(
        &first.id,
        UnitPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();

    let acceptance = d.accept_alert(&alert.id).unwrap();
    assert_eq!(acceptance.incident.unit_id, second.id);
}

#[test]
fn test_accept_without_operational_unit_leaves_alert_active() {
    let d = dispatcher();
    let station = bare_station(&d, "Outpost");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();

    let err = d.accept_alert(&alert.id).unwrap_err();
    assert!(matches!(err, DispatchError::NoOperationalUnit { .. }));

    let alert = d.get_alert(&alert.id).unwrap();
    assert_eq!(alert.status, AlertStatus::Active);
    assert!(d.list_incidents(&IncidentQuery::default()).unwrap().is_empty());
    assert_eq!(flags(&d, &station.id), (true, false));
}

#[test]
fn test_decline_requires_reason_and_is_final() {
    let d = dispatcher();
    let (station, _, _) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();

    let err = d
        .decline_alert(
            &alert.id,
            DeclineRequest {
                reason: "  ".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));

    let declined = d
        .decline_alert(
            &alert.id,
            DeclineRequest {
                reason: "hoax call".to_string(),
            },
        )
        .unwrap();
    assert_eq!(declined.status, AlertStatus::Rejected);
    assert_eq!(declined.decline_reason.as_deref(), Some("hoax call"));
    assert_eq!(flags(&d, &station.id), (false, false));

    let err = d.accept_alert(&alert.id).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTransition { .. }));
}

#[test]
fn test_list_alerts_filters_by_station_and_status() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let first = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    d.submit_alert(alert_request(&reporter, &north.id)).unwrap();
    d.accept_alert(&first.id).unwrap();

    let central_alerts = d
        .list_alerts(&AlertQuery {
            station_id: Some(central.id.clone()),
            status: None,
        })
        .unwrap();
    assert_eq!(central_alerts.len(), 2);
    assert_eq!(central_alerts[0].id, first.id);

    let active = d
        .list_alerts(&AlertQuery {
            station_id: None,
            status: Some(AlertStatus::Active),
        })
        .unwrap();
    assert_eq!(active.len(), 2);
}

// ============================================================================
// Alert Referrals
// ============================================================================

#[test]
fn test_alert_referral_accept_moves_ownership() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, north_ops, north_unit) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();

    let referral = d.refer_alert(&alert.id, refer(&north)).unwrap();
    assert_eq!(referral.status, ReferralStatus::Pending);
    assert_eq!(referral.from_station_id, central.id);

    let locked = d.get_alert(&alert.id).unwrap();
    assert_eq!(locked.status, AlertStatus::Referred);
    assert_eq!(locked.station_id, central.id);
    assert_eq!(flags(&d, &central.id), (false, false));
    assert_eq!(flags(&d, &north.id), (true, false));

    // A referred alert cannot be triaged at the source
    assert!(d.accept_alert(&alert.id).is_err());

    let answered = d.respond_referral(&referral.id, accept()).unwrap();
    assert_eq!(answered.status, ReferralStatus::Accepted);
    assert!(answered.responded_at.is_some());

    let moved = d.get_alert(&alert.id).unwrap();
    assert_eq!(moved.status, AlertStatus::Active);
    assert_eq!(moved.station_id, north.id);
    assert_eq!(moved.department_id.as_deref(), Some(north_ops.id.as_str()));
    assert_eq!(moved.unit_id.as_deref(), Some(north_unit.id.as_str()));
    assert!(moved.referred_to_station_id.is_none());
    assert_eq!(flags(&d, &central.id), (false, false));
    assert_eq!(flags(&d, &north.id), (true, false));

    // The new owner triages it normally
    let acceptance = d.accept_alert(&alert.id).unwrap();
    assert_eq!(acceptance.incident.station_id, north.id);
}

#[test]
fn test_alert_referral_reject_returns_alert_to_source() {
    let d = dispatcher();
    let (central, central_ops, _) = equipped_station(&d, "Central");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    let referral = d.refer_alert(&alert.id, refer(&north)).unwrap();

    let answered = d.respond_referral(&referral.id, reject()).unwrap();
    assert_eq!(answered.status, ReferralStatus::Rejected);
    assert_eq!(answered.response_note.as_deref(), Some("no crew available"));

    let back = d.get_alert(&alert.id).unwrap();
    assert_eq!(back.status, AlertStatus::Active);
    assert_eq!(back.station_id, central.id);
    assert_eq!(back.department_id.as_deref(), Some(central_ops.id.as_str()));
    assert_eq!(flags(&d, &central.id), (true, false));
    assert_eq!(flags(&d, &north.id), (false, false));

    let err = d.respond_referral(&referral.id, accept()).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTransition { .. }));
}

#[test]
fn test_referral_target_must_be_available() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (busy, _, _) = equipped_station(&d, "Busy");
    let (closed, _, _) = equipped_station(&d, "Closed");
    let reporter = citizen_id(&d);
    d.update_station(
        &closed.id,
        StationPatch {
            commission_status: Some(CommissionStatus::UnderMaintenance),
            ..Default::default()
        },
    )
    .unwrap();
    d.submit_alert(alert_request(&reporter, &busy.id)).unwrap();
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();

    let err = d.refer_alert(&alert.id, refer(&busy)).unwrap_err();
    assert!(matches!(err, DispatchError::StationUnavailable { .. }));

    let err = d.refer_alert(&alert.id, refer(&closed)).unwrap_err();
    assert!(matches!(err, DispatchError::StationUnavailable { .. }));

    let err = d.refer_alert(&alert.id, refer(&central)).unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));

    let mut no_reason = refer(&busy);
    no_reason.reason = String::new();
    let err = d.refer_alert(&alert.id, no_reason).unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));

    assert_eq!(d.get_alert(&alert.id).unwrap().status, AlertStatus::Active);
    assert!(d.list_referrals(&ReferralQuery::default()).unwrap().is_empty());
}

#[test]
fn test_pending_referral_makes_target_busy() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (east, _, _) = equipped_station(&d, "East");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let first = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    let second = d.submit_alert(alert_request(&reporter, &east.id)).unwrap();

    d.refer_alert(&first.id, refer(&north)).unwrap();
    let err = d.refer_alert(&second.id, refer(&north)).unwrap_err();
    assert!(matches!(err, DispatchError::StationUnavailable { .. }));
}

// ============================================================================
// Incident Lifecycle
// ============================================================================

#[test]
fn test_incident_lifecycle_issues_single_turnout_slip() {
    let d = dispatcher();
    let (station, department, unit) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();
    let incident = d.accept_alert(&alert.id).unwrap().incident;

    let err = d.turnout_slip(&incident.id).unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));

    let dispatched = d
        .advance_incident(&incident.id, AdvanceRequest::default())
        .unwrap();
    assert_eq!(dispatched.incident.status, IncidentStatus::Dispatched);
    assert!(dispatched.incident.dispatched_at.is_some());

    let slip = dispatched.turnout_slip.expect("slip on dispatch");
    assert_eq!(slip.incident_id, incident.id);
    assert_eq!(slip.alert_id, alert.id);
    assert_eq!(slip.station.name, "Central");
    assert_eq!(slip.department.id, department.id);
    assert_eq!(slip.unit.name, unit.name);
    assert_eq!(slip.reporter.name, "Ama Mensah");
    assert_eq!(slip.incident_type, "structure fire");
    assert_eq!(Some(slip.dispatched_at), dispatched.incident.dispatched_at);

    assert_eq!(d.turnout_slip(&incident.id).unwrap(), slip);

    let on_scene = d
        .advance_incident(
            &incident.id,
            AdvanceRequest {
                to: Some(IncidentStatus::OnScene),
            },
        )
        .unwrap();
    assert!(on_scene.turnout_slip.is_none());
    assert!(on_scene.incident.on_scene_at.is_some());
    assert_eq!(flags(&d, &station.id), (false, true));

    let resolved = d
        .advance_incident(&incident.id, AdvanceRequest::default())
        .unwrap();
    assert_eq!(resolved.incident.status, IncidentStatus::Resolved);
    assert_eq!(flags(&d, &station.id), (false, false));

    let closed = d
        .advance_incident(&incident.id, AdvanceRequest::default())
        .unwrap();
    assert_eq!(closed.incident.status, IncidentStatus::Closed);
    assert!(closed.incident.closed_at.is_some());

    let err = d
        .advance_incident(&incident.id, AdvanceRequest::default())
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTransition { .. }));
}

#[test]
fn test_incident_cannot_skip_or_go_back() {
    let d = dispatcher();
    let (station, _, _) = equipped_station(&d, "Central");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &station.id)).unwrap();
    let incident = d.accept_alert(&alert.id).unwrap().incident;

    for to in [IncidentStatus::OnScene, IncidentStatus::Closed, IncidentStatus::Active] {
        let err = d
            .advance_incident(&incident.id, AdvanceRequest { to: Some(to) })
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidTransition { .. }));
    }
    assert_eq!(
        d.get_incident(&incident.id).unwrap().status,
        IncidentStatus::Active
    );
}

// ============================================================================
// Incident Referrals
// ============================================================================

#[test]
fn test_incident_referral_accept_reassigns_unit() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, north_ops, north_unit) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    let incident = d.accept_alert(&alert.id).unwrap().incident;

    let referral = d
        .refer_incident(&incident.id, &north.id, "out of area")
        .unwrap();
    assert_eq!(flags(&d, &north.id), (false, true));

    // Locked while the referral is pending
    let err = d
        .advance_incident(&incident.id, AdvanceRequest::default())
        .unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));
    let err = d
        .refer_incident(&incident.id, &north.id, "again")
        .unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));

    d.respond_referral(&referral.id, accept()).unwrap();

    let moved = d.get_incident(&incident.id).unwrap();
    assert_eq!(moved.station_id, north.id);
    assert_eq!(moved.department_id, north_ops.id);
    assert_eq!(moved.unit_id, north_unit.id);
    assert_eq!(moved.status, IncidentStatus::Active);
    assert!(moved.referred_to_station_id.is_none());
    assert_eq!(flags(&d, &central.id), (false, false));
    assert_eq!(flags(&d, &north.id), (false, true));
}

#[test]
fn test_incident_referral_accept_needs_target_unit() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let outpost = bare_station(&d, "Outpost");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    let incident = d.accept_alert(&alert.id).unwrap().incident;
    let referral = d
        .refer_incident(&incident.id, &outpost.id, "out of area")
        .unwrap();

    let err = d.respond_referral(&referral.id, accept()).unwrap_err();
    assert!(matches!(err, DispatchError::NoOperationalUnit { .. }));

    // Nothing moved; the target can still reject
    let pending = d
        .list_referrals(&ReferralQuery {
            status: Some(ReferralStatus::Pending),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    d.respond_referral(&referral.id, reject()).unwrap();
    let back = d.get_incident(&incident.id).unwrap();
    assert_eq!(back.station_id, central.id);
    assert!(back.referred_to_station_id.is_none());
    assert_eq!(flags(&d, &outpost.id), (false, false));
}

#[test]
fn test_resolved_incident_cannot_be_referred() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();
    let incident = d.accept_alert(&alert.id).unwrap().incident;
    for _ in 0..3 {
        d.advance_incident(&incident.id, AdvanceRequest::default())
            .unwrap();
    }

    let err = d
        .refer_incident(&incident.id, &north.id, "too late")
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTransition { .. }));
}

// ============================================================================
// Flags and Notifications
// ============================================================================

#[test]
fn test_recompute_all_flags_repairs_stale_station() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    d.submit_alert(alert_request(&reporter, &central.id)).unwrap();

    let mut stale = d.get_station(&central.id).unwrap();
    stale.has_active_alert = false;
    d.store().put(&stale).unwrap();
    let mut stale = d.get_station(&north.id).unwrap();
    stale.has_active_incident = true;
    d.store().put(&stale).unwrap();

    assert_eq!(d.recompute_all_flags().unwrap(), 2);
    assert_eq!(flags(&d, &central.id), (true, false));
    assert_eq!(flags(&d, &north.id), (false, false));
    assert_eq!(d.recompute_all_flags().unwrap(), 0);
}

#[test]
fn test_station_subscription_sees_its_events_only() {
    let d = dispatcher();
    let (central, _, _) = equipped_station(&d, "Central");
    let (north, _, _) = equipped_station(&d, "North");
    let reporter = citizen_id(&d);
    let mut central_feed = d.notifier().subscribe(Some(central.id.clone()));
    let mut north_feed = d.notifier().subscribe(Some(north.id.clone()));

    let alert = d.submit_alert(alert_request(&reporter, &central.id)).unwrap();

    let mut kinds = Vec::new();
    while let Some(event) = central_feed.try_recv() {
        kinds.push(event.kind());
    }
    assert!(kinds.contains(&"alert_created"));
    assert!(kinds.contains(&"station_flags_changed"));
    assert!(north_feed.try_recv().is_none());

    d.refer_alert(&alert.id, refer(&north)).unwrap();
    let mut saw_referral = false;
    while let Some(event) = north_feed.try_recv() {
        if let DispatchEvent::ReferralCreated(r) = event {
            assert_eq!(r.subject_id, alert.id);
            saw_referral = true;
        }
    }
    assert!(saw_referral);
}

// ============================================================================
// Admin Guards
// ============================================================================

#[test]
fn test_station_with_personnel_cannot_be_deleted() {
    let d = dispatcher();
    let (station, department, unit) = equipped_station(&d, "Central");
    let officer = d
        .create_personnel(dispatchd::admin::PersonnelInput {
            name: "Kofi Boateng".to_string(),
            station_id: station.id.clone(),
            rank: None,
            phone: None,
        })
        .unwrap();

    let err = d.delete_station(&station.id).unwrap_err();
    assert!(matches!(err, DispatchError::Conflict(_)));
    assert!(d.get_unit(&unit.id).is_ok());

    d.delete_personnel(&officer.id).unwrap();
    d.delete_station(&station.id).unwrap();
    assert!(d.get_station(&station.id).is_err());
    assert!(d.get_department(&department.id).is_err());
    assert!(d.get_unit(&unit.id).is_err());
}
