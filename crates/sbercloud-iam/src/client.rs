//! SberCloud IAM API client
//!
//! Talks to the Keystone v3 compatible identity endpoint: password token
//! issuance and AK/SK-signed project lookup.

use crate::error::{IamError, Result};
use crate::signer::{DATE_HEADER, Signer};
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time allowed for establishing the connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Time allowed for a whole request, response body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const USER_AGENT: &str = concat!("sbercloud-provider/", env!("CARGO_PKG_VERSION"));

/// IAM client bound to one identity endpoint
pub struct IamClient {
    client: reqwest::Client,
    endpoint: Url,
}

/// Project-scoped token returned by a password login
#[derive(Debug)]
pub struct TokenInfo {
    pub token: SecretString,
    pub project_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A project visible to the caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<String>,
}

/// Credentials for a password login
pub struct PasswordCredentials<'a> {
    pub user_name: &'a str,
    pub password: &'a SecretString,
    pub domain_name: &'a str,
    pub project_name: &'a str,
}

impl IamClient {
    /// Build a client; `insecure` disables certificate verification
    pub fn new(endpoint: &str, insecure: bool) -> Result<Self> {
        Self::with_timeout(endpoint, insecure, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, insecure: bool, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        if insecure {
            tracing::warn!("TLS certificate verification is disabled for {}", endpoint);
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Join a relative path onto the identity endpoint
    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| IamError::InvalidEndpoint(format!("{}{}: {}", self.endpoint, path, e)))
    }

    /// POST /auth/tokens with a project-scoped password identity
    pub async fn issue_token(&self, credentials: &PasswordCredentials<'_>) -> Result<TokenInfo> {
        let url = self.url("auth/tokens")?;
        let request_body = TokenRequest::password(credentials);

        tracing::debug!(
            "Requesting token for {}@{} scoped to {}",
            credentials.user_name,
            credentials.domain_name,
            credentials.project_name
        );

        let response = self.client.post(url).json(&request_body).send().await?;
        let response = check_status(response).await?;

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| SecretString::from(v.to_string()))
            .ok_or(IamError::MissingToken)?;

        let api_response: ApiTokenResponse = response.json().await?;
        Ok(TokenInfo {
            token,
            project_id: api_response.token.project.map(|p| p.id),
            expires_at: api_response.token.expires_at,
        })
    }

    /// GET /projects?name=... signed with AK/SK
    pub async fn list_projects(
        &self,
        access_key: &str,
        secret_key: &SecretString,
        name: &str,
    ) -> Result<Vec<ProjectInfo>> {
        let mut url = self.url("projects")?;
        url.query_pairs_mut().append_pair("name", name);

        let signed = Signer::new(access_key, secret_key.expose_secret()).sign(
            "GET",
            &url,
            b"",
            Utc::now(),
        )?;

        tracing::debug!("Listing projects named {}", name);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::HOST, signed.host)
            .header(DATE_HEADER, signed.date)
            .header(reqwest::header::AUTHORIZATION, signed.authorization)
            .send()
            .await?;
        let response = check_status(response).await?;

        let api_response: ApiProjectsResponse = response.json().await?;
        Ok(api_response.projects)
    }
}

/// Normalise the endpoint so relative joins append to its path
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let mut normalised = endpoint.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    let url = Url::parse(&normalised)
        .map_err(|e| IamError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(IamError::InvalidEndpoint(format!(
            "{}: unsupported scheme {}",
            endpoint, other
        ))),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IamError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Pull the message out of either IAM error body shape
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: Some(ApiError {
                message: Some(message),
                ..
            }),
            ..
        }) => message,
        Ok(ApiErrorBody {
            error_msg: Some(message),
            ..
        }) => message,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

// ============ API Types ============

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: TokenAuth<'a>,
}

#[derive(Debug, Serialize)]
struct TokenAuth<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Debug, Serialize)]
struct Identity<'a> {
    methods: [&'a str; 1],
    password: PasswordIdentity<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordIdentity<'a> {
    user: User<'a>,
}

#[derive(Debug, Serialize)]
struct User<'a> {
    name: &'a str,
    password: &'a str,
    domain: Named<'a>,
}

#[derive(Debug, Serialize)]
struct Scope<'a> {
    project: Named<'a>,
}

#[derive(Debug, Serialize)]
struct Named<'a> {
    name: &'a str,
}

impl<'a> TokenRequest<'a> {
    fn password(credentials: &'a PasswordCredentials<'a>) -> Self {
        Self {
            auth: TokenAuth {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordIdentity {
                        user: User {
                            name: credentials.user_name,
                            password: credentials.password.expose_secret(),
                            domain: Named {
                                name: credentials.domain_name,
                            },
                        },
                    },
                },
                scope: Scope {
                    project: Named {
                        name: credentials.project_name,
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiTokenResponse {
    token: ApiToken,
}

#[derive(Debug, Deserialize)]
struct ApiToken {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    project: Option<ApiProject>,
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiProjectsResponse {
    #[serde(default)]
    projects: Vec<ProjectInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[allow(dead_code)]
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}
