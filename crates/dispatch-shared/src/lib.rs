//! Shared types for the station dispatch components.
//!
//! Documents, status enums, notification events and the common error type.
//! The daemon (`dispatchd`) owns persistence and the workflows.

pub mod alert;
pub mod document;
pub mod error;
pub mod events;
pub mod incident;
pub mod people;
pub mod referral;
pub mod station;
pub mod turnout;
pub mod version;

pub use alert::{AlertStatus, EmergencyAlert};
pub use document::{new_id, Collection, Document};
pub use error::{DispatchError, Result};
pub use events::DispatchEvent;
pub use incident::{Incident, IncidentStatus};
pub use people::{Citizen, Personnel, ReporterKind, ReporterRef};
pub use referral::{Referral, ReferralStatus, ReferralSubject};
pub use station::{
    CommissionStatus, Department, GeoPoint, Station, StationFlags, Unit, OPERATIONS_DEPARTMENT,
};
pub use turnout::{NamedRef, ReporterSnapshot, TurnoutSlip};
pub use version::{VersionInfo, BUILD_DATE, GIT_SHA, VERSION};

/// State directory for the daemon
pub const STATE_DIR: &str = "/var/lib/dispatch";

/// Default HTTP bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7870";
