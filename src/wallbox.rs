//! myWallbox cloud API client module.
//!
//! Provides authentication and read access to the charger and
//! charging-session endpoints used for report generation.
//! The API is treated as an opaque external service:
//! this module only signs in, lists the account's chargers,
//! and fetches completed sessions for a time range.

use anyhow::{Context, anyhow};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::date::ReportWindow;
use crate::error::ReportError;

/// Sign-in endpoint, authenticated with HTTP Basic auth.
const AUTH_URL: &str = "https://user-api.wall-box.com/users/signin";

/// Base URL for the charger and session endpoints.
const API_BASE_URL: &str = "https://api.wall-box.com";

/// Page size for the session list endpoint.
/// Pagination is not handled; one page covers any realistic report window.
const SESSION_LIMIT: u32 = 1000;

/// One completed charging session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionRecord {
    /// Session start as a Unix timestamp.
    pub start: i64,
    /// Session end as a Unix timestamp.
    pub end: i64,
    /// Charging time in seconds.
    #[serde(rename = "time")]
    pub charging_time: i64,
    /// Total energy delivered during the session.
    pub energy: f64,
    /// Unit for the energy values, for example "kWh".
    pub energy_unit: String,
    /// Portion of the energy supplied by on-site solar generation.
    pub green_energy: f64,
    /// Session cost.
    pub cost: f64,
    /// Currency symbol for the cost values, for example "€".
    pub cost_unit: String,
    /// Savings attributable to solar generation.
    pub cost_savings: f64,
}

impl SessionRecord {
    /// Energy drawn from the grid: total energy minus the solar portion.
    #[must_use]
    pub fn grid_energy(&self) -> f64 {
        self.energy - self.green_energy
    }
}

/// Chargers associated with an account.
///
/// Resolution to a single charger branches on this tag,
/// never on the shape of the API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargerInventory {
    None,
    Single(u64),
    Multiple(Vec<u64>),
}

impl ChargerInventory {
    /// Build an inventory from the charger IDs listed for the account.
    #[must_use]
    pub fn from_ids(ids: Vec<u64>) -> Self {
        match ids.as_slice() {
            [] => Self::None,
            [id] => Self::Single(*id),
            _ => Self::Multiple(ids),
        }
    }

    /// Resolve to exactly one charger ID.
    ///
    /// A requested ID must be present in the inventory.
    /// Without a requested ID, a single charger is auto-selected;
    /// zero or multiple chargers fail with an explicit message.
    ///
    /// # Errors
    /// Returns a charger resolution error (exit code 2) on failure.
    pub fn resolve(&self, requested: Option<u64>) -> Result<u64, ReportError> {
        if let Some(id) = requested {
            return if self.contains(id) {
                Ok(id)
            } else {
                Err(ReportError::UnknownCharger(id))
            };
        }
        match self {
            Self::Single(id) => Ok(*id),
            Self::None => Err(ReportError::NoChargers),
            Self::Multiple(ids) => Err(ReportError::MultipleChargers(ids.clone())),
        }
    }

    fn contains(&self, id: u64) -> bool {
        match self {
            Self::None => false,
            Self::Single(single) => *single == id,
            Self::Multiple(ids) => ids.contains(&id),
        }
    }
}

/// Response envelope for the sign-in endpoint.
#[derive(Debug, Deserialize)]
struct SigninResponse {
    data: SigninData,
}

#[derive(Debug, Deserialize)]
struct SigninData {
    attributes: SigninAttributes,
}

#[derive(Debug, Deserialize)]
struct SigninAttributes {
    token: String,
}

/// Response envelope for the charger groups endpoint.
#[derive(Debug, Deserialize)]
struct ChargerGroupsResponse {
    result: ChargerGroupsResult,
}

#[derive(Debug, Deserialize)]
struct ChargerGroupsResult {
    groups: Vec<ChargerGroup>,
}

#[derive(Debug, Deserialize)]
struct ChargerGroup {
    chargers: Vec<ChargerSummary>,
}

#[derive(Debug, Deserialize)]
struct ChargerSummary {
    id: u64,
}

/// Response envelope for the session list endpoint.
#[derive(Debug, Deserialize)]
struct SessionListResponse {
    data: Vec<SessionEntry>,
}

#[derive(Debug, Deserialize)]
struct SessionEntry {
    attributes: SessionRecord,
}

/// myWallbox API client.
///
/// Holds the bearer token obtained from `authenticate`;
/// the data endpoints refuse to run before authentication.
#[derive(Debug)]
pub struct WallboxClient {
    client: Client,
    token: Option<String>,
}

impl WallboxClient {
    /// Create a new unauthenticated client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            token: None,
        }
    }

    /// Sign in with the account credentials and store the bearer token.
    ///
    /// # Errors
    /// Returns `ReportError::Authentication` when the service rejects the
    /// credentials, or a generic error when the request itself fails.
    pub async fn authenticate(&mut self, user: &str, password: &str) -> Result<(), ReportError> {
        let response = self
            .client
            .get(AUTH_URL)
            .basic_auth(user, Some(password))
            .header("Partner", "wallbox")
            .send()
            .await
            .context("Failed to send sign-in request")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ReportError::Authentication);
        }
        if !status.is_success() {
            return Err(anyhow!("Sign-in request failed: HTTP {status}").into());
        }

        let signin: SigninResponse = response
            .json()
            .await
            .context("Failed to parse sign-in response")?;
        self.token = Some(signin.data.attributes.token);
        Ok(())
    }

    /// Fetch the chargers associated with the account.
    ///
    /// # Errors
    /// Returns an error if the client is not authenticated or the request fails.
    pub async fn charger_inventory(&self) -> Result<ChargerInventory, ReportError> {
        let token = self.token()?;
        let url = format!("{API_BASE_URL}/v3/chargers/groups");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send charger list request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Charger list request failed: HTTP {status}").into());
        }

        let groups: ChargerGroupsResponse = response
            .json()
            .await
            .context("Failed to parse charger list response")?;

        let ids: Vec<u64> = groups
            .result
            .groups
            .into_iter()
            .flat_map(|group| group.chargers)
            .map(|charger| charger.id)
            .collect();

        Ok(ChargerInventory::from_ids(ids))
    }

    /// Fetch the completed sessions for a charger within the report window,
    /// sorted ascending by start timestamp.
    ///
    /// An empty result is valid and yields an empty list.
    ///
    /// # Errors
    /// Returns an error if the client is not authenticated or the request fails.
    pub async fn fetch_sessions(
        &self,
        charger_id: u64,
        window: &ReportWindow,
    ) -> Result<Vec<SessionRecord>, ReportError> {
        let token = self.token()?;
        let url = format!("{API_BASE_URL}/v4/sessions/stats");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("charger_id", charger_id.to_string()),
                ("start_date", window.start.timestamp().to_string()),
                ("end_date", window.end.timestamp().to_string()),
                ("limit", SESSION_LIMIT.to_string()),
                ("offset", "0".to_string()),
            ])
            .send()
            .await
            .context("Failed to send session list request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Session list request failed: HTTP {status}").into());
        }

        let sessions: SessionListResponse = response
            .json()
            .await
            .context("Failed to parse session list response")?;

        let mut records: Vec<SessionRecord> = sessions
            .data
            .into_iter()
            .map(|entry| entry.attributes)
            .collect();
        records.sort_by_key(|record| record.start);
        Ok(records)
    }

    fn token(&self) -> Result<&str, ReportError> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow!("Not authenticated. Call authenticate() first.").into())
    }
}

impl Default for WallboxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_charger_inventory {
    use super::*;

    #[test]
    fn from_ids_tags_by_count() {
        assert_eq!(ChargerInventory::from_ids(vec![]), ChargerInventory::None);
        assert_eq!(ChargerInventory::from_ids(vec![7]), ChargerInventory::Single(7));
        assert_eq!(
            ChargerInventory::from_ids(vec![7, 13]),
            ChargerInventory::Multiple(vec![7, 13])
        );
    }

    #[test]
    fn single_charger_is_auto_selected() {
        let inventory = ChargerInventory::Single(7);
        assert_eq!(inventory.resolve(None).expect("should auto-select"), 7);
    }

    #[test]
    fn requested_id_must_exist() {
        let inventory = ChargerInventory::Single(7);
        match inventory.resolve(Some(99)) {
            Err(ReportError::UnknownCharger(99)) => {}
            other => panic!("expected UnknownCharger(99), got {other:?}"),
        }
    }

    #[test]
    fn requested_id_is_used_when_present() {
        let inventory = ChargerInventory::Multiple(vec![7, 13]);
        assert_eq!(inventory.resolve(Some(13)).expect("should resolve"), 13);
    }

    #[test]
    fn multiple_chargers_without_request_fail() {
        let inventory = ChargerInventory::Multiple(vec![7, 13]);
        match inventory.resolve(None) {
            Err(ReportError::MultipleChargers(ids)) => assert_eq!(ids, vec![7, 13]),
            other => panic!("expected MultipleChargers, got {other:?}"),
        }
    }

    #[test]
    fn empty_account_fails_resolution() {
        let inventory = ChargerInventory::None;
        assert!(matches!(inventory.resolve(None), Err(ReportError::NoChargers)));
    }

    #[test]
    fn requested_id_on_empty_account_is_unknown() {
        let inventory = ChargerInventory::None;
        assert!(matches!(
            inventory.resolve(Some(7)),
            Err(ReportError::UnknownCharger(7))
        ));
    }

    #[test]
    fn resolution_failures_exit_with_2() {
        let inventory = ChargerInventory::Multiple(vec![7, 13]);
        let error = inventory.resolve(None).expect_err("should fail");
        assert_eq!(error.exit_code(), 2);
    }
}


#[cfg(test)]
mod test_session_record {
    use super::*;

    fn record(energy: f64, green_energy: f64) -> SessionRecord {
        SessionRecord {
            start: 0,
            end: 3600,
            charging_time: 3600,
            energy,
            energy_unit: "kWh".to_string(),
            green_energy,
            cost: 1.0,
            cost_unit: "€".to_string(),
            cost_savings: 0.5,
        }
    }

    #[test]
    fn grid_energy_is_total_minus_green() {
        let session = record(12.5, 4.2);
        assert!((session.grid_energy() - 8.3).abs() < 1e-9);
    }

    #[test]
    fn grid_energy_is_zero_for_full_solar_sessions() {
        let session = record(5.0, 5.0);
        assert!(session.grid_energy().abs() < f64::EPSILON);
    }

    #[test]
    fn records_sort_ascending_by_start() {
        let mut records = vec![
            SessionRecord { start: 300, ..record(1.0, 0.0) },
            SessionRecord { start: 100, ..record(1.0, 0.0) },
            SessionRecord { start: 200, ..record(1.0, 0.0) },
        ];
        records.sort_by_key(|session| session.start);
        let starts: Vec<i64> = records.iter().map(|session| session.start).collect();
        assert_eq!(starts, vec![100, 200, 300]);
    }
}
