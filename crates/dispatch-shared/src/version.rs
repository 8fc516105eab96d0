//! Single source of truth for version and build information.

use serde::{Deserialize, Serialize};

/// Crate version, shared by the daemon and its clients
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git SHA captured at build time
pub const GIT_SHA: &str = env!("DISPATCH_GIT_SHA");

/// UTC build date
pub const BUILD_DATE: &str = env!("DISPATCH_BUILD_DATE");

/// Version triple reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_sha: String,
    pub build_date: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION.to_string(),
            git_sha: GIT_SHA.to_string(),
            build_date: BUILD_DATE.to_string(),
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{} ({}, {})", self.version, self.git_sha, self.build_date)
    }
}
