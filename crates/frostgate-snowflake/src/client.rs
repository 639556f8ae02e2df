// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Snowflake SQL API v2.
//!
//! Provides [`SnowflakeClient`], the [`Warehouse`] implementation used by
//! the gateway: statement execution with positional bindings, PUT-based
//! stage upload, and a connectivity probe. Authentication is either a
//! key-pair JWT minted per request or a session token obtained once at
//! connect time; a dropped session is not re-established.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, info};

use frostgate_config::{AuthType, SnowflakeConfig};
use frostgate_core::{FrostgateError, Row, StageAck, Warehouse};

use crate::auth::JwtSigner;
use crate::types::{
    Binding, LoginData, LoginRequest, LoginResponse, StatementRequest, StatementResponse,
};

/// Request timeout for every upstream call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

enum Auth {
    /// JWT minted on demand from the configured private key.
    Keypair(JwtSigner),
    /// Session token from `login-request`, fixed for the process lifetime.
    Session(String),
}

/// Snowflake SQL API client.
///
/// Constructed eagerly at process start via [`SnowflakeClient::connect`]
/// and shared as `Arc<dyn Warehouse>`.
pub struct SnowflakeClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
    database: String,
    schema: String,
    warehouse: Option<String>,
    role: Option<String>,
    stage: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for SnowflakeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeClient")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl SnowflakeClient {
    /// Connect using the configured credentials.
    ///
    /// Password auth performs the session login here; key-pair auth only
    /// loads the key, and mints JWTs lazily per request.
    pub async fn connect(config: &SnowflakeConfig) -> Result<Self, FrostgateError> {
        let account = require(&config.account, "snowflake.account")?;
        let host = match &config.region {
            Some(region) => format!("https://{account}.{region}.snowflakecomputing.com"),
            None => format!("https://{account}.snowflakecomputing.com"),
        };
        Self::connect_to(config, host).await
    }

    /// Connect against an explicit base URL (for testing with wiremock).
    #[cfg(test)]
    pub async fn connect_with_base_url(
        config: &SnowflakeConfig,
        base_url: String,
    ) -> Result<Self, FrostgateError> {
        Self::connect_to(config, base_url).await
    }

    async fn connect_to(config: &SnowflakeConfig, base_url: String) -> Result<Self, FrostgateError> {
        let account = require(&config.account, "snowflake.account")?;
        let user = require(&config.user, "snowflake.user")?;
        let database = require(&config.database, "snowflake.database")?;
        let schema = require(&config.schema, "snowflake.schema")?;

        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FrostgateError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let auth = match config.auth_type {
            AuthType::Keypair => {
                let key_path = require(&config.private_key_path, "snowflake.private_key_path")?;
                let pem = tokio::fs::read_to_string(&key_path).await.map_err(|e| {
                    FrostgateError::Config(format!("cannot read private key at {key_path}: {e}"))
                })?;
                let signer = JwtSigner::from_pem(&pem, &account, &user)?;
                info!(issuer = signer.issuer(), "key-pair auth ready");
                Auth::Keypair(signer)
            }
            AuthType::Password => {
                let password = require(&config.password, "snowflake.password")?;
                let token = login(&http, &base_url, &account, &user, &password).await?;
                info!(user = %user, "session established");
                Auth::Session(token)
            }
        };

        Ok(Self {
            http,
            base_url,
            auth,
            database,
            schema,
            warehouse: config.warehouse.clone(),
            role: config.role.clone(),
            stage: config.stage.clone(),
            timeout_secs: config.statement_timeout_secs,
        })
    }

    /// Stage that receives uploads, as configured.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    fn auth_headers(&self) -> Result<HeaderMap, FrostgateError> {
        let mut headers = HeaderMap::new();
        match &self.auth {
            Auth::Keypair(signer) => {
                let jwt = signer.token()?;
                headers.insert(
                    "authorization",
                    HeaderValue::from_str(&format!("Bearer {jwt}")).map_err(|e| {
                        FrostgateError::Internal(format!("invalid JWT header value: {e}"))
                    })?,
                );
                headers.insert(
                    "x-snowflake-authorization-token-type",
                    HeaderValue::from_static("KEYPAIR_JWT"),
                );
            }
            Auth::Session(token) => {
                headers.insert(
                    "authorization",
                    HeaderValue::from_str(&format!("Snowflake Token=\"{token}\"")).map_err(
                        |e| FrostgateError::Internal(format!("invalid session header value: {e}")),
                    )?,
                );
            }
        }
        Ok(headers)
    }
}

#[async_trait]
impl Warehouse for SnowflakeClient {
    async fn execute(
        &self,
        statement: &str,
        bindings: &[String],
    ) -> Result<Vec<Row>, FrostgateError> {
        let bound: BTreeMap<String, Binding> = bindings
            .iter()
            .enumerate()
            .map(|(i, value)| ((i + 1).to_string(), Binding::text(value.clone())))
            .collect();

        let request = StatementRequest {
            statement: statement.to_string(),
            timeout: self.timeout_secs,
            database: self.database.clone(),
            schema: self.schema.clone(),
            warehouse: self.warehouse.clone(),
            role: self.role.clone(),
            bindings: bound,
        };

        debug!(statement = %statement, bindings = bindings.len(), "executing statement");

        let response = self
            .http
            .post(format!("{}/api/v2/statements", self.base_url))
            .headers(self.auth_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| FrostgateError::Upstream {
                message: format!("statement request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FrostgateError::Upstream {
            message: format!("failed to read statement response: {e}"),
            source: Some(Box::new(e)),
        })?;

        // 202 means async execution, which this client never requests and
        // does not poll for; anything but 200 is surfaced as a failure.
        if status != StatusCode::OK {
            let message = serde_json::from_str::<StatementResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("statement API returned {status}: {body}"));
            return Err(FrostgateError::upstream(message));
        }

        let parsed: StatementResponse =
            serde_json::from_str(&body).map_err(|e| FrostgateError::Upstream {
                message: format!("failed to parse statement response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(parsed.rows())
    }

    async fn stage_upload(
        &self,
        local_path: &Path,
        stage_path: &str,
    ) -> Result<StageAck, FrostgateError> {
        let abs = tokio::fs::canonicalize(local_path)
            .await
            .map_err(FrostgateError::from)?;

        let statement = format!(
            "PUT file://{} @{}/{} AUTO_COMPRESS=FALSE OVERWRITE=TRUE",
            abs.display(),
            self.stage,
            stage_path
        );
        self.execute(&statement, &[]).await?;

        Ok(StageAck {
            stage: self.stage.clone(),
            path: stage_path.to_string(),
        })
    }

    async fn probe(&self) -> Result<(), FrostgateError> {
        self.execute("SELECT 1", &[]).await.map(|_| ())
    }
}

/// One-shot session login for password auth.
async fn login(
    http: &reqwest::Client,
    base_url: &str,
    account: &str,
    user: &str,
    password: &str,
) -> Result<String, FrostgateError> {
    let request = LoginRequest {
        data: LoginData {
            account_name: account.to_ascii_uppercase(),
            login_name: user.to_string(),
            password: password.to_string(),
        },
    };

    let response = http
        .post(format!("{base_url}/session/v1/login-request"))
        .json(&request)
        .send()
        .await
        .map_err(|e| FrostgateError::Upstream {
            message: format!("login request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| FrostgateError::Upstream {
        message: format!("failed to read login response: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        return Err(FrostgateError::upstream(format!(
            "login returned {status}: {body}"
        )));
    }

    let parsed: LoginResponse =
        serde_json::from_str(&body).map_err(|e| FrostgateError::Upstream {
            message: format!("failed to parse login response: {e}"),
            source: Some(Box::new(e)),
        })?;

    if !parsed.success {
        return Err(FrostgateError::upstream(
            parsed
                .message
                .unwrap_or_else(|| "login rejected by Snowflake".to_string()),
        ));
    }

    parsed
        .data
        .and_then(|d| d.token)
        .ok_or_else(|| FrostgateError::upstream("login response carried no session token"))
}

fn require(value: &Option<String>, key: &str) -> Result<String, FrostgateError> {
    value
        .clone()
        .ok_or_else(|| FrostgateError::Config(format!("{key} is required")))
}
