//! Service endpoints and client settings

use serde::{Deserialize, Serialize};
use url::Url;

/// Nominatim search settings
///
/// The public instance allows one request per second and rejects requests
/// without an identifying User-Agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Server root; `/search` is appended
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,

    /// Comma-separated ISO country codes limiting results ("" = worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// Identifies this application to the service
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Spacing enforced between consecutive searches, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

/// OSRM routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Server root; `/route/v1/{profile}/...` is appended
    #[serde(default = "default_osrm_url")]
    pub base_url: String,

    /// Routing profile (`driving`, `cycling`, `foot`)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_route_timeout_secs")]
    pub timeout_secs: u64,
}

/// IP geolocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLocationConfig {
    /// Lookup endpoint returning `{status, lat, lon}` JSON
    #[serde(default = "default_ip_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_ip_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_profile() -> String {
    "driving".to_string()
}

fn default_user_agent() -> String {
    format!("Wayfinder/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_lookup_timeout_secs() -> u64 {
    5
}

const fn default_route_timeout_secs() -> u64 {
    10
}

const fn default_min_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            timeout_secs: default_lookup_timeout_secs(),
            country_filter: String::new(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_osrm_url(),
            profile: default_profile(),
            timeout_secs: default_route_timeout_secs(),
        }
    }
}

impl Default for IpLocationConfig {
    fn default() -> Self {
        Self {
            base_url: default_ip_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl NominatimConfig {
    /// Settings for mocked servers: no request spacing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check endpoint, timeout and User-Agent
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        check_endpoint(&self.base_url, self.timeout_secs)?;
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

impl OsrmConfig {
    /// Settings for mocked servers: shorter timeout
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Check endpoint, timeout and profile
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        check_endpoint(&self.base_url, self.timeout_secs)?;
        if self.profile.trim().is_empty() {
            return Err("profile must not be empty".to_string());
        }
        Ok(())
    }
}

impl IpLocationConfig {
    /// Check endpoint and timeout
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        check_endpoint(&self.base_url, self.timeout_secs)
    }
}

fn check_endpoint(base_url: &str, timeout_secs: u64) -> Result<(), String> {
    if base_url.is_empty() {
        return Err("base_url must not be empty".to_string());
    }
    let parsed = Url::parse(base_url).map_err(|e| format!("base_url is invalid: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("base_url must use http or https, got {}", parsed.scheme()));
    }
    if timeout_secs == 0 {
        return Err("timeout_secs must be at least 1".to_string());
    }
    Ok(())
}
