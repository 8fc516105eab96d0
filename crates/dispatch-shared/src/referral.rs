//! Referrals: one station handing an alert or incident to another.

use crate::document::{Collection, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What is being referred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralSubject {
    Alert,
    Incident,
}

impl std::fmt::Display for ReferralSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Incident => write!(f, "incident"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ReferralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReferralStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown referral status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    pub id: String,
    pub subject: ReferralSubject,
    pub subject_id: String,
    pub from_station_id: String,
    pub to_station_id: String,
    pub reason: String,
    #[serde(default)]
    pub status: ReferralStatus,
    #[serde(default)]
    pub response_note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Referral {
    pub fn new(
        subject: ReferralSubject,
        subject_id: impl Into<String>,
        from_station_id: impl Into<String>,
        to_station_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::document::new_id(),
            subject,
            subject_id: subject_id.into(),
            from_station_id: from_station_id.into(),
            to_station_id: to_station_id.into(),
            reason: reason.into(),
            status: ReferralStatus::Pending,
            response_note: None,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReferralStatus::Pending
    }

    pub fn involves(&self, station_id: &str) -> bool {
        self.from_station_id == station_id || self.to_station_id == station_id
    }
}

impl Document for Referral {
    const COLLECTION: Collection = Collection::Referrals;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
