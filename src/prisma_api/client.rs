//! Blocking HTTP client for the Prisma Cloud API.

use super::error::ApiError;
use super::types::{
    AccountGroup, LoginRequest, LoginResponse, Token, UsageQuery, UsageResponse,
    ACCOUNT_GROUPS_ENDPOINT, LOGIN_ENDPOINT, USAGE_ENDPOINT,
};
use crate::secrets::Credentials;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_TIMEOUT: Duration = Duration::from_secs(15);
const AUTH_HEADER: &str = "x-redlock-auth";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// The read side of the API the billing report needs.
pub trait UsageApi {
    fn list_account_groups(&self) -> Result<Vec<AccountGroup>, ApiError>;

    fn usage_series(&self, query: &UsageQuery) -> Result<UsageResponse, ApiError>;
}

pub struct PrismaClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<Token>,
}

impl PrismaClient {
    /// Client for `https://<api_host>`.
    pub fn new(api_host: &str) -> Self {
        Self::with_base_url(format!("https://{}", api_host))
    }

    /// Client for an explicit scheme + authority, e.g. `http://127.0.0.1:8080`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(API_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Logs in with the access key / secret key. The token is kept for every
    /// later call made through this client.
    pub fn authenticate(&mut self, credentials: &Credentials) -> Result<Token, ApiError> {
        let payload = serde_json::to_string(&LoginRequest {
            username: &credentials.access_key,
            password: &credentials.secret_key,
        })
        .map_err(|e| ApiError::UnexpectedResponse {
            endpoint: LOGIN_ENDPOINT.to_string(),
            detail: format!("could not encode login request: {}", e),
        })?;

        tracing::debug!(url = %self.url(LOGIN_ENDPOINT), "logging in");
        let body = self
            .agent
            .post(self.url(LOGIN_ENDPOINT).as_str())
            .header("Content-Type", JSON_CONTENT_TYPE)
            .send(&payload)
            .map_err(|e| ApiError::from_transport(LOGIN_ENDPOINT, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::from_transport(LOGIN_ENDPOINT, e))?;

        let response: LoginResponse = decode(LOGIN_ENDPOINT, &body)?;
        let token = match response.token {
            Some(token) if !token.trim().is_empty() => Token::new(token),
            _ => {
                return Err(ApiError::Authentication {
                    reason: "login response did not contain a token".to_string(),
                })
            }
        };

        tracing::info!("authenticated against {}", self.base_url);
        self.token = Some(token.clone());
        Ok(token)
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.token
            .as_ref()
            .map(Token::as_str)
            .ok_or_else(|| ApiError::Authentication {
                reason: "not logged in".to_string(),
            })
    }
}

impl UsageApi for PrismaClient {
    fn list_account_groups(&self) -> Result<Vec<AccountGroup>, ApiError> {
        let token = self.token()?;
        tracing::debug!(endpoint = ACCOUNT_GROUPS_ENDPOINT, "listing account groups");
        let body = self
            .agent
            .get(self.url(ACCOUNT_GROUPS_ENDPOINT).as_str())
            .header(AUTH_HEADER, token)
            .call()
            .map_err(|e| ApiError::from_transport(ACCOUNT_GROUPS_ENDPOINT, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::from_transport(ACCOUNT_GROUPS_ENDPOINT, e))?;

        let groups: Vec<AccountGroup> = decode(ACCOUNT_GROUPS_ENDPOINT, &body)?;
        tracing::debug!(count = groups.len(), "account groups listed");
        Ok(groups)
    }

    fn usage_series(&self, query: &UsageQuery) -> Result<UsageResponse, ApiError> {
        let token = self.token()?;
        let payload =
            serde_json::to_string(&query.body()).map_err(|e| ApiError::UnexpectedResponse {
                endpoint: USAGE_ENDPOINT.to_string(),
                detail: format!("could not encode usage request: {}", e),
            })?;

        tracing::debug!(
            endpoint = USAGE_ENDPOINT,
            scoped = !query.is_unscoped(),
            accounts = query.account_ids.len(),
            amount = query.time_range.amount,
            unit = ?query.time_range.unit,
            "querying license usage"
        );
        let body = self
            .agent
            .post(self.url(USAGE_ENDPOINT).as_str())
            .header("Content-Type", JSON_CONTENT_TYPE)
            .header(AUTH_HEADER, token)
            .send(&payload)
            .map_err(|e| ApiError::from_transport(USAGE_ENDPOINT, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::from_transport(USAGE_ENDPOINT, e))?;

        decode(USAGE_ENDPOINT, &body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
